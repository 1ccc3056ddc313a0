use iced::widget::{button, column, container, row, text, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{
    bold_text, format_rating, icon, ICON_INFO_CIRCLE, ICON_PLAY_FILL, ICON_STAR_FILL,
};
use crate::media::{
    truncate_description, ListItem, MediaKey, Message, BRAND_RED, RATING_GOLD, SURFACE_DARK_GRAY,
    TEXT_GRAY, TEXT_WHITE,
};
use crate::tmdb::ImageSize;
use crate::Movieflix;

const HERO_HEIGHT: f32 = 560.0;

impl Movieflix {
    /// Leads with the first popular movie.
    pub fn hero_item(&self) -> Option<&ListItem> {
        self.home_rows.first().and_then(|row| row.items.first())
    }

    pub fn view_hero_section(&self) -> Element<'_, Message> {
        match self.hero_item() {
            Some(item) => self.view_hero_with_content(item),
            None => self.view_hero_placeholder(),
        }
    }

    fn view_hero_placeholder(&self) -> Element<'_, Message> {
        container(text("No featured title").size(24).color(TEXT_GRAY))
            .width(Length::Fill)
            .height(Length::Fixed(HERO_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(HERO_HEIGHT))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                ..Default::default()
            })
            .into()
    }

    fn view_hero_with_content<'a>(&'a self, item: &'a ListItem) -> Element<'a, Message> {
        let title = bold_text(&item.title, 48, TEXT_WHITE);

        let rating = row![
            icon(ICON_STAR_FILL).size(14).color(RATING_GOLD),
            text(format_rating(item.vote_average))
                .size(15)
                .color(TEXT_WHITE),
            text(item.year().unwrap_or_default())
                .size(15)
                .color(TEXT_GRAY),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let description = container(
            text(truncate_description(&item.overview, 200))
                .size(16)
                .color(TEXT_GRAY),
        )
        .max_width(560.0);

        let key = item.key();
        let buttons = row![
            self.view_hero_play_button(key),
            self.view_hero_details_button(key)
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center);

        let hero_text = column![title, rating, description, buttons]
            .spacing(20)
            .padding(Padding::new(64.0).left(48.0).right(48.0));

        let left_gradient = container(hero_text)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_y(iced::alignment::Vertical::Bottom)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                    iced::gradient::Linear::new(0.0)
                        .add_stop(0.0, Color::from_rgba(0.0, 0.0, 0.0, 0.95))
                        .add_stop(0.4, Color::from_rgba(0.0, 0.0, 0.0, 0.6))
                        .add_stop(0.8, Color::TRANSPARENT),
                ))),
                ..Default::default()
            });

        let bottom_fade = container(Space::new().width(Length::Fill).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                    iced::gradient::Linear::new(std::f32::consts::PI)
                        .add_stop(0.0, Color::TRANSPARENT)
                        .add_stop(0.75, Color::TRANSPARENT)
                        .add_stop(1.0, Color::from_rgb(0.035, 0.035, 0.043)),
                ))),
                ..Default::default()
            });

        iced::widget::stack![self.view_hero_backdrop(item), bottom_fade, left_gradient]
            .width(Length::Fill)
            .height(Length::Fixed(HERO_HEIGHT))
            .into()
    }

    fn view_hero_backdrop<'a>(&'a self, item: &'a ListItem) -> Element<'a, Message> {
        match self.cached_image(item.backdrop_path.as_ref(), ImageSize::Backdrop) {
            Some(handle) => iced::widget::image(handle)
                .width(Length::Fill)
                .height(Length::Fixed(HERO_HEIGHT))
                .content_fit(iced::ContentFit::Cover)
                .into(),
            None => container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fixed(HERO_HEIGHT))
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                    ..Default::default()
                })
                .into(),
        }
    }

    fn view_hero_play_button(&self, key: MediaKey) -> Element<'_, Message> {
        button(
            row![
                icon(ICON_PLAY_FILL).size(14).color(TEXT_WHITE),
                text("Play").size(16).color(TEXT_WHITE)
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0).left(24.0).right(24.0))
        .style(|_theme, status| {
            let background_color = match status {
                button::Status::Hovered => Color::from_rgb(0.7, 0.1, 0.1),
                _ => BRAND_RED,
            };
            button::Style {
                background: Some(iced::Background::Color(background_color)),
                text_color: TEXT_WHITE,
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::OpenDetail(key))
        .into()
    }

    fn view_hero_details_button(&self, key: MediaKey) -> Element<'_, Message> {
        button(
            row![
                icon(ICON_INFO_CIRCLE).size(14).color(TEXT_WHITE),
                text("Details").size(16).color(TEXT_WHITE)
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0).left(24.0).right(24.0))
        .style(|_theme, status| {
            let alpha = match status {
                button::Status::Hovered => 0.3,
                _ => 0.2,
            };
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    1.0, 1.0, 1.0, alpha,
                ))),
                text_color: TEXT_WHITE,
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::OpenDetail(key))
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_query::ListTab;
    use crate::media::{HomeRow, MediaKind};
    use crate::testing::list_item;

    #[test]
    fn hero_leads_with_first_popular_movie() {
        let mut app = Movieflix::default();
        assert!(app.hero_item().is_none());

        app.home_rows = vec![HomeRow {
            title: String::from("Popular Movies"),
            kind: MediaKind::Movie,
            tab: ListTab::Popular,
            items: vec![list_item(MediaKind::Movie, 7), list_item(MediaKind::Movie, 8)],
        }];

        assert_eq!(app.hero_item().map(ListItem::key), Some(MediaKey::movie(7)));
        let _hero: Element<'_, Message> = app.view_hero_section();
    }
}
