use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{
    bold_text, format_rating, hidden_scrollbar_style, icon, skeleton_style, solid_button_style,
    ICON_BOX_ARROW_UP_RIGHT, ICON_FILM, ICON_PLAY_FILL, ICON_STAR_FILL, ICON_X_LG,
};
use crate::detail::{DetailLoader, DetailState, DetailView};
use crate::media::{
    DetailRecord, DetailSlot, Genre, Message, Runtime, BRAND_RED, RATING_GOLD, SURFACE_DARK_GRAY,
    TEXT_GRAY, TEXT_WHITE,
};
use crate::route::Route;
use crate::tmdb::ImageSize;
use crate::Movieflix;

const POPUP_WIDTH: f32 = 920.0;
const MINI_HERO_HEIGHT: f32 = 420.0;

pub fn format_full_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] if year.len() == 4 => format!("{}/{}/{}", month, day, year),
        _ => date.to_string(),
    }
}

pub fn format_genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_runtime(runtime: Runtime) -> String {
    let minutes = match runtime {
        Runtime::Total(m) | Runtime::PerEpisode(m) => m,
    };
    let length = match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    };
    match runtime {
        Runtime::Total(_) => length,
        Runtime::PerEpisode(_) => format!("{} / episode", length),
    }
}

fn popup_container_style(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(Color::from_rgb(
            0.078, 0.078, 0.078,
        ))),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 16.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
            offset: iced::Vector::new(0.0, 25.0),
            blur_radius: 50.0,
        },
        ..Default::default()
    }
}

impl Movieflix {
    /// The modal: dimmed backdrop that closes on click, centred popup on top.
    pub fn view_detail_modal(&self) -> Element<'_, Message> {
        let content = scrollable(self.view_detail_body(DetailSlot::Modal, &self.modal))
            .direction(scrollable::Direction::Vertical(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(hidden_scrollbar_style);

        let popup_with_close = iced::widget::stack![content, self.view_detail_close_button()]
            .width(Length::Fixed(POPUP_WIDTH))
            .height(Length::Fill);

        let popup = container(popup_with_close)
            .max_width(POPUP_WIDTH)
            .clip(true)
            .style(popup_container_style);

        let overlay_bg = iced::widget::mouse_area(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        0.0, 0.0, 0.0, 0.85,
                    ))),
                    ..Default::default()
                }),
        )
        .on_press(Message::CloseDetail);

        let centered_popup = container(iced::widget::mouse_area(popup))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .padding(Padding::new(40.0));

        iced::widget::stack![overlay_bg, centered_popup]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_detail_close_button(&self) -> Element<'_, Message> {
        let btn = button(
            container(icon(ICON_X_LG).size(18).color(TEXT_WHITE))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        )
        .width(Length::Fixed(36.0))
        .height(Length::Fixed(36.0))
        .padding(0)
        .style(|_theme, status| {
            let alpha = if matches!(status, button::Status::Hovered) {
                0.8
            } else {
                0.6
            };
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.0, 0.0, 0.0, alpha,
                ))),
                text_color: TEXT_WHITE,
                border: Border {
                    radius: 18.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::CloseDetail);

        container(btn)
            .width(Length::Fill)
            .align_x(iced::alignment::Horizontal::Right)
            .padding(Padding::new(20.0))
            .into()
    }

    /// Shared by the modal and the standalone page.
    pub fn view_detail_body<'a>(
        &'a self,
        slot: DetailSlot,
        loader: &'a DetailLoader,
    ) -> Element<'a, Message> {
        match loader.state() {
            DetailState::Idle | DetailState::Loading(_) => view_detail_skeleton(),
            DetailState::Failed(_) => container(
                column![
                    icon(ICON_FILM).size(40).color(TEXT_GRAY),
                    text("No data available").size(18).color(TEXT_GRAY)
                ]
                .spacing(16)
                .align_x(iced::Alignment::Center),
            )
            .width(Length::Fill)
            .height(Length::Fixed(MINI_HERO_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(MINI_HERO_HEIGHT))
            .into(),
            DetailState::Loaded(view) => {
                let mut sections: Vec<Element<Message>> = vec![
                    self.view_detail_mini_hero(slot, view),
                    self.view_detail_content_and_cast(view),
                ];
                if view.detail.kind == crate::media::MediaKind::Tv {
                    sections.push(self.view_detail_seasons_section(slot, loader));
                }
                if !view.recommendations.is_empty() {
                    sections.push(self.view_detail_recommendations(&view.recommendations));
                }
                Column::with_children(sections).width(Length::Fill).into()
            }
        }
    }

    fn view_detail_mini_hero<'a>(
        &'a self,
        slot: DetailSlot,
        view: &'a DetailView,
    ) -> Element<'a, Message> {
        let detail = &view.detail;
        let backdrop: Element<Message> =
            match self.cached_image(detail.backdrop_path.as_ref(), ImageSize::Backdrop) {
                Some(handle) => iced::widget::image(handle)
                    .width(Length::Fill)
                    .height(Length::Fixed(MINI_HERO_HEIGHT))
                    .content_fit(iced::ContentFit::Cover)
                    .border_radius(16.0)
                    .into(),
                None => container(Space::new().width(Length::Fill).height(MINI_HERO_HEIGHT))
                    .width(Length::Fill)
                    .height(Length::Fixed(MINI_HERO_HEIGHT))
                    .style(|_theme| container::Style {
                        background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                        border: Border {
                            radius: 16.0.into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    })
                    .into(),
            };

        let poster = Self::image_or_placeholder(
            self.cached_image(detail.poster_path.as_ref(), ImageSize::Poster),
            140.0,
            210.0,
            8.0,
            ICON_FILM,
        );

        let hero_text = column![
            bold_text(&detail.title, 32, TEXT_WHITE),
            view_hero_metadata(detail),
            self.view_detail_hero_buttons(slot, view)
        ]
        .spacing(16);

        let hero_content = row![poster, hero_text]
            .spacing(24)
            .align_y(iced::Alignment::End)
            .padding(Padding::new(32.0));

        let gradient = container(hero_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_y(iced::alignment::Vertical::Bottom)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                    iced::gradient::Linear::new(std::f32::consts::PI)
                        .add_stop(0.0, Color::TRANSPARENT)
                        .add_stop(0.4, Color::from_rgba(0.0, 0.0, 0.0, 0.3))
                        .add_stop(0.6, Color::from_rgba(0.078, 0.078, 0.078, 0.7))
                        .add_stop(1.0, Color::from_rgba(0.078, 0.078, 0.078, 1.0)),
                ))),
                border: Border {
                    radius: 16.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        container(
            iced::widget::stack![backdrop, gradient]
                .width(Length::Fill)
                .height(Length::Fixed(MINI_HERO_HEIGHT)),
        )
        .clip(true)
        .style(|_theme| container::Style {
            border: Border {
                radius: 16.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
    }

    fn view_detail_hero_buttons<'a>(
        &'a self,
        slot: DetailSlot,
        view: &'a DetailView,
    ) -> Element<'a, Message> {
        let trailer = button(
            row![
                icon(ICON_PLAY_FILL).size(16).color(TEXT_WHITE),
                text("Watch trailer").size(16).color(TEXT_WHITE)
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0).left(24.0).right(24.0))
        .style(solid_button_style(BRAND_RED, Color::from_rgb(0.698, 0.027, 0.063)))
        .on_press_maybe(
            view.trailer
                .as_ref()
                .map(|video| Message::OpenTrailer(video.key.clone())),
        );

        let mut buttons = row![trailer].spacing(12).align_y(iced::Alignment::Center);

        if slot == DetailSlot::Modal {
            let open_page = button(
                row![
                    icon(ICON_BOX_ARROW_UP_RIGHT).size(14).color(TEXT_WHITE),
                    text("Open page").size(16).color(TEXT_WHITE)
                ]
                .spacing(8)
                .align_y(iced::Alignment::Center),
            )
            .padding(Padding::new(12.0).left(24.0).right(24.0))
            .style(|_theme, status| {
                let alpha = if matches!(status, button::Status::Hovered) {
                    0.15
                } else {
                    0.1
                };
                button::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        1.0, 1.0, 1.0, alpha,
                    ))),
                    text_color: TEXT_WHITE,
                    border: Border {
                        color: Color::from_rgba(1.0, 1.0, 1.0, 0.3),
                        width: 1.0,
                        radius: 4.0.into(),
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press(Message::Navigate(Route::Detail(view.key())));
            buttons = buttons.push(open_page);
        }

        buttons.into()
    }

    fn view_detail_content_and_cast<'a>(&'a self, view: &'a DetailView) -> Element<'a, Message> {
        let detail = &view.detail;
        let mut items: Vec<Element<Message>> = Vec::new();

        if let Some(tagline) = detail.tagline.as_ref().filter(|t| !t.is_empty()) {
            items.push(
                text(format!("\"{}\"", tagline))
                    .size(20)
                    .color(TEXT_WHITE)
                    .font(iced::Font {
                        style: iced::font::Style::Italic,
                        ..Default::default()
                    })
                    .into(),
            );
        }

        let overview = if detail.overview.is_empty() {
            "No overview available."
        } else {
            detail.overview.as_str()
        };
        items.push(text(overview).size(16).color(TEXT_GRAY).into());

        let mut facts: Vec<Element<Message>> = Vec::new();
        if let Some(date) = &detail.date {
            facts.push(text(format_full_date(date)).size(14).color(TEXT_GRAY).into());
        }
        if !detail.genres.is_empty() {
            facts.push(
                text(format_genres(&detail.genres))
                    .size(14)
                    .color(TEXT_GRAY)
                    .into(),
            );
        }
        if let Some(status) = &detail.status {
            facts.push(text(status).size(14).color(TEXT_GRAY).into());
        }
        items.push(Column::with_children(facts).spacing(6).into());

        let content = Column::with_children(items)
            .spacing(20)
            .width(Length::FillPortion(2));

        row![content, self.view_detail_cast_section(&view.cast)]
            .spacing(32)
            .padding(Padding::new(32.0))
            .width(Length::Fill)
            .into()
    }
}

fn view_hero_metadata<'a>(detail: &DetailRecord) -> Element<'a, Message> {
    let separator = || text("•").size(14).color(TEXT_GRAY);
    let mut items: Vec<Element<'a, Message>> = Vec::new();

    if let Some(year) = detail.date.as_deref().and_then(|d| d.get(..4)) {
        items.push(text(year.to_string()).size(14).color(TEXT_GRAY).into());
    }
    if detail.vote_average > 0.0 {
        if !items.is_empty() {
            items.push(separator().into());
        }
        items.push(
            row![
                icon(ICON_STAR_FILL).size(12).color(RATING_GOLD),
                text(format_rating(detail.vote_average))
                    .size(14)
                    .color(RATING_GOLD)
            ]
            .spacing(4)
            .align_y(iced::Alignment::Center)
            .into(),
        );
    }
    if let Some(runtime) = detail.runtime() {
        if !items.is_empty() {
            items.push(separator().into());
        }
        items.push(text(format_runtime(runtime)).size(14).color(TEXT_GRAY).into());
    }
    if let Some(seasons) = detail.number_of_seasons {
        if !items.is_empty() {
            items.push(separator().into());
        }
        let label = if seasons == 1 { "Season" } else { "Seasons" };
        items.push(
            text(format!("{} {}", seasons, label))
                .size(14)
                .color(TEXT_GRAY)
                .into(),
        );
    }

    Row::with_children(items)
        .spacing(8)
        .align_y(iced::Alignment::Center)
        .into()
}

fn view_detail_skeleton<'a>() -> Element<'a, Message> {
    let hero = container(Space::new().width(Length::Fill).height(MINI_HERO_HEIGHT))
        .width(Length::Fill)
        .height(Length::Fixed(MINI_HERO_HEIGHT))
        .style(skeleton_style(16.0));

    let bar = |width: f32, height: f32| container(Space::new().width(width).height(height)).style(skeleton_style(4.0));

    let content = column![
        bar(200.0, 32.0),
        bar(150.0, 16.0),
        container(Space::new().width(Length::Fill).height(14)).style(skeleton_style(4.0)),
        bar(300.0, 14.0)
    ]
    .spacing(12)
    .padding(Padding::new(32.0))
    .width(Length::Fill);

    column![hero, content].width(Length::Fill).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_shown_month_first() {
        assert_eq!(format_full_date("2008-07-16"), "07/16/2008");
        assert_eq!(format_full_date("2008"), "2008");
    }

    #[test]
    fn runtime_labels() {
        assert_eq!(format_runtime(Runtime::Total(152)), "2h 32m");
        assert_eq!(format_runtime(Runtime::Total(120)), "2h");
        assert_eq!(format_runtime(Runtime::PerEpisode(45)), "45m / episode");
    }
}
