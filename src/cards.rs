use iced::widget::{button, column, container, row, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{
    bold_text, format_rating, horizontal_scroll, icon, ICON_CHEVRON_RIGHT, ICON_FILM,
    ICON_STAR_FILL,
};
use crate::list_query::ListQuery;
use crate::media::{
    truncate_description, HomeRow, ListItem, MediaKind, Message, ACCENT_BLUE, BRAND_RED,
    RATING_GOLD, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::route::Route;
use crate::tmdb::ImageSize;
use crate::Movieflix;

pub const CARD_WIDTH: f32 = 160.0;
pub const CARD_HEIGHT: f32 = 240.0;
const ROW_LIMIT: usize = 20;
const GRID_COLUMNS: usize = 6;

fn kind_badge<'a>(kind: MediaKind) -> Element<'a, Message> {
    let background = match kind {
        MediaKind::Movie => BRAND_RED,
        MediaKind::Tv => ACCENT_BLUE,
    };
    container(bold_text(kind.badge(), 11, TEXT_WHITE))
        .padding(Padding::new(2.0).left(6.0).right(6.0))
        .style(move |_theme| container::Style {
            background: Some(iced::Background::Color(background)),
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

impl Movieflix {
    pub fn view_home_rows(&self) -> Element<'_, Message> {
        let rows: Vec<Element<Message>> = self
            .home_rows
            .iter()
            .map(|row| self.view_home_row(row))
            .collect();

        Column::with_children(rows)
            .spacing(40)
            .padding(Padding::new(24.0).left(48.0).right(48.0))
            .width(Length::Fill)
            .into()
    }

    fn view_home_row<'a>(&'a self, home_row: &'a HomeRow) -> Element<'a, Message> {
        let see_all = button(
            row![
                text("See all").size(14),
                icon(ICON_CHEVRON_RIGHT).size(12)
            ]
            .spacing(4)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(4.0).left(8.0).right(8.0))
        .style(|_theme, status| button::Style {
            background: None,
            text_color: match status {
                button::Status::Hovered => TEXT_WHITE,
                _ => TEXT_GRAY,
            },
            border: Border::default(),
            shadow: Shadow::default(),
            snap: false,
        })
        .on_press(Message::Navigate(Route::List(ListQuery::new(
            home_row.kind,
            home_row.tab,
        ))));

        let header = row![
            bold_text(&home_row.title, 22, TEXT_WHITE),
            Space::new().width(Length::Fill),
            see_all
        ]
        .align_y(iced::Alignment::Center);

        let cards: Vec<Element<Message>> = home_row
            .items
            .iter()
            .take(ROW_LIMIT)
            .map(|item| self.view_poster_card(item, false))
            .collect();

        column![
            header,
            horizontal_scroll(Row::with_children(cards).spacing(12))
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }

    pub fn view_card_grid<'a>(&'a self, items: &'a [ListItem], show_kind: bool) -> Element<'a, Message> {
        let rows: Vec<Element<Message>> = items
            .chunks(GRID_COLUMNS)
            .map(|chunk| {
                let cards: Vec<Element<Message>> = chunk
                    .iter()
                    .map(|item| self.view_poster_card(item, show_kind))
                    .collect();
                Row::with_children(cards)
                    .spacing(16)
                    .align_y(iced::Alignment::Start)
                    .into()
            })
            .collect();

        Column::with_children(rows)
            .spacing(24)
            .width(Length::Fill)
            .into()
    }

    /// Poster with title and rating; hovering reveals the overview.
    pub fn view_poster_card<'a>(&'a self, item: &'a ListItem, show_kind: bool) -> Element<'a, Message> {
        let key = item.key();
        let is_hovered = self.hovered_card == Some(key);

        let poster = Self::image_or_placeholder(
            self.cached_image(item.poster_path.as_ref(), ImageSize::Poster),
            CARD_WIDTH,
            CARD_HEIGHT,
            8.0,
            ICON_FILM,
        );

        let mut layers = iced::widget::stack![poster];
        if show_kind {
            layers = layers.push(container(kind_badge(item.kind)).padding(8));
        }
        if is_hovered {
            layers = layers.push(self.view_card_hover_overlay(item));
        }

        let card = container(layers.width(CARD_WIDTH).height(CARD_HEIGHT))
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .style(move |_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, if is_hovered { 0.6 } else { 0.3 }),
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: if is_hovered { 16.0 } else { 8.0 },
                },
                ..Default::default()
            });

        let caption = column![
            text(&item.title)
                .size(14)
                .color(TEXT_WHITE)
                .wrapping(text::Wrapping::None),
            row![
                icon(ICON_STAR_FILL).size(11).color(RATING_GOLD),
                text(format_rating(item.vote_average))
                    .size(12)
                    .color(TEXT_GRAY),
                text(item.year().unwrap_or_default())
                    .size(12)
                    .color(TEXT_GRAY),
            ]
            .spacing(6)
            .align_y(iced::Alignment::Center),
        ]
        .spacing(4)
        .width(Length::Fixed(CARD_WIDTH))
        .clip(true);

        iced::widget::mouse_area(column![card, caption].spacing(8))
            .on_enter(Message::HoverCard(Some(key)))
            .on_exit(Message::HoverCard(None))
            .on_press(Message::OpenDetail(key))
            .interaction(iced::mouse::Interaction::Pointer)
            .into()
    }

    fn view_card_hover_overlay<'a>(&'a self, item: &'a ListItem) -> Element<'a, Message> {
        let overview = if item.overview.is_empty() {
            String::from("No overview available.")
        } else {
            truncate_description(&item.overview, 110)
        };

        container(
            column![
                bold_text(&item.title, 14, TEXT_WHITE),
                text(overview).size(12).color(TEXT_GRAY),
            ]
            .spacing(6),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(12)
        .align_y(iced::alignment::Vertical::Bottom)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                iced::gradient::Linear::new(std::f32::consts::PI)
                    .add_stop(0.0, Color::TRANSPARENT)
                    .add_stop(0.35, Color::from_rgba(0.0, 0.0, 0.0, 0.6))
                    .add_stop(1.0, Color::from_rgba(0.0, 0.0, 0.0, 0.95)),
            ))),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
    }
}
