use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::list_query::{ListQuery, ListTab};
use crate::media::{
    LoadingState, MediaKind, Message, BRAND_RED, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::route::Route;
use crate::search::SearchState;
use crate::tmdb::{image_url, ImageSize};
use crate::Movieflix;

pub const ICON_SEARCH: char = '\u{F52A}';
pub const ICON_FILM: char = '\u{F3A9}';
pub const ICON_PLAY_FILL: char = '\u{F4F4}';
pub const ICON_INFO_CIRCLE: char = '\u{F431}';
pub const ICON_STAR_FILL: char = '\u{F586}';
pub const ICON_PERSON_FILL: char = '\u{F4DA}';
pub const ICON_X_LG: char = '\u{F659}';
pub const ICON_CHEVRON_LEFT: char = '\u{F284}';
pub const ICON_CHEVRON_RIGHT: char = '\u{F285}';
pub const ICON_BOX_ARROW_UP_RIGHT: char = '\u{F1C5}';

pub const MAIN_SCROLL_ID: &str = "main-scroll";
pub const HEADER_HEIGHT: f32 = 72.0;

pub fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

pub fn bold_text(s: impl ToString, size: u32, color: Color) -> iced::widget::Text<'static> {
    text(s.to_string()).size(size).color(color).font(iced::Font {
        weight: iced::font::Weight::Bold,
        ..Default::default()
    })
}

pub fn rounded_style(radius: f32, bg: Option<Color>) -> container::Style {
    container::Style {
        background: bg.map(iced::Background::Color),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn pill_button_style(active: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let background = match (active, status) {
            (true, _) => TEXT_WHITE,
            (false, button::Status::Hovered) => Color::from_rgba(1.0, 1.0, 1.0, 0.2),
            (false, _) => Color::from_rgba(1.0, 1.0, 1.0, 0.1),
        };
        button::Style {
            background: Some(iced::Background::Color(background)),
            text_color: if active { Color::BLACK } else { TEXT_WHITE },
            border: Border {
                radius: 16.0.into(),
                ..Default::default()
            },
            shadow: Shadow::default(),
            snap: false,
        }
    }
}

pub fn solid_button_style(
    base: Color,
    hovered: Color,
) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| button::Style {
        background: Some(iced::Background::Color(match status {
            button::Status::Hovered => hovered,
            _ => base,
        })),
        text_color: TEXT_WHITE,
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

pub fn hidden_scrollbar_style(_theme: &iced::Theme, _status: scrollable::Status) -> scrollable::Style {
    let transparent_rail = scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
        },
    };
    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: transparent_rail.clone(),
        horizontal_rail: transparent_rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            shadow: Shadow::default(),
            icon: Color::TRANSPARENT,
        },
    }
}

pub fn horizontal_scroll(content: Row<'_, Message>) -> Element<'_, Message> {
    scrollable(content)
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(0).scroller_width(0),
        ))
        .width(Length::Fill)
        .style(hidden_scrollbar_style)
        .into()
}

pub fn format_rating(rating: f32) -> String {
    format!("{:.1}", rating)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavItem {
    Home,
    Movies,
    Tv,
    Search,
}

impl NavItem {
    fn of(route: &Route) -> Option<NavItem> {
        match route {
            Route::Home => Some(NavItem::Home),
            Route::List(query) if query.kind == MediaKind::Movie => Some(NavItem::Movies),
            Route::List(_) => Some(NavItem::Tv),
            Route::Search { .. } => Some(NavItem::Search),
            Route::Detail(_) => None,
        }
    }

    fn route(self, search: &SearchState) -> Route {
        match self {
            NavItem::Home => Route::Home,
            NavItem::Movies => Route::List(ListQuery::new(MediaKind::Movie, ListTab::Popular)),
            NavItem::Tv => Route::List(ListQuery::new(MediaKind::Tv, ListTab::Popular)),
            NavItem::Search => Route::Search {
                query: search.input.clone(),
            },
        }
    }
}

impl Movieflix {
    pub fn cached_image(
        &self,
        path: Option<&String>,
        size: ImageSize,
    ) -> Option<iced::widget::image::Handle> {
        let url = image_url(path?, size);
        self.image_cache.get(&url).cloned()
    }

    pub fn image_or_placeholder<'a>(
        handle: Option<iced::widget::image::Handle>,
        width: f32,
        height: f32,
        radius: f32,
        placeholder: char,
    ) -> Element<'a, Message> {
        match handle {
            Some(h) => container(
                iced::widget::image(h)
                    .width(Length::Fixed(width))
                    .height(Length::Fixed(height))
                    .content_fit(iced::ContentFit::Cover)
                    .border_radius(radius),
            )
            .into(),
            None => container(icon(placeholder).size(28).color(TEXT_GRAY))
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .center_x(Length::Fixed(width))
                .center_y(Length::Fixed(height))
                .style(move |_| rounded_style(radius, Some(SURFACE_DARK_GRAY)))
                .into(),
        }
    }

    pub fn view_header(&self) -> Element<'_, Message> {
        let logo = button(bold_text("MOVIEFLIX", 26, BRAND_RED))
            .padding(0)
            .style(|_theme, _status| button::Style {
                background: None,
                text_color: BRAND_RED,
                border: Border::default(),
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press(Message::Navigate(Route::Home));

        let left_section = row![logo, self.view_navigation()]
            .spacing(32)
            .align_y(iced::Alignment::Center);

        let header_content = row![
            left_section,
            Space::new().width(Length::Fill),
            self.view_history_buttons()
        ]
        .padding(Padding::new(16.0).left(48.0).right(48.0))
        .align_y(iced::Alignment::Center);

        let is_scrolled = self.main_scroll_offset > 50.0;

        container(header_content)
            .width(Length::Fill)
            .height(Length::Fixed(HEADER_HEIGHT))
            .style(move |_theme| {
                let alpha = if is_scrolled { 0.95 } else { 0.6 };
                container::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        0.0, 0.0, 0.0, alpha,
                    ))),
                    ..Default::default()
                }
            })
            .into()
    }

    fn view_navigation(&self) -> Element<'_, Message> {
        let active = NavItem::of(self.history.current());
        let items = [
            (NavItem::Home, "Home"),
            (NavItem::Movies, "Movies"),
            (NavItem::Tv, "TV"),
            (NavItem::Search, "Search"),
        ];

        let buttons: Vec<Element<Message>> = items
            .into_iter()
            .map(|(item, label)| {
                let is_active = active == Some(item);
                let label: Element<Message> = if item == NavItem::Search {
                    row![icon(ICON_SEARCH).size(13), text(label).size(14)]
                        .spacing(6)
                        .align_y(iced::Alignment::Center)
                        .into()
                } else {
                    text(label).size(14).into()
                };
                button(label)
                    .padding(Padding::new(8.0).left(10.0).right(10.0))
                    .style(move |_theme, status| button::Style {
                        background: None,
                        text_color: match status {
                            button::Status::Hovered => TEXT_WHITE,
                            _ if is_active => TEXT_WHITE,
                            _ => TEXT_GRAY,
                        },
                        border: Border::default(),
                        shadow: Shadow::default(),
                        snap: false,
                    })
                    .on_press(Message::Navigate(item.route(&self.search)))
                    .into()
            })
            .collect();

        Row::with_children(buttons)
            .spacing(12)
            .align_y(iced::Alignment::Center)
            .into()
    }

    fn view_history_buttons(&self) -> Element<'_, Message> {
        let arrow = |glyph: char, message: Message, enabled: bool| {
            let color = if enabled { TEXT_WHITE } else { TEXT_GRAY };
            button(
                container(icon(glyph).size(14).color(color))
                    .center_x(Length::Fixed(32.0))
                    .center_y(Length::Fixed(32.0)),
            )
            .padding(0)
            .style(move |_theme, status| button::Style {
                background: Some(iced::Background::Color(match status {
                    button::Status::Hovered if enabled => Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                    _ => Color::from_rgba(1.0, 1.0, 1.0, 0.08),
                })),
                text_color: color,
                border: Border {
                    radius: 16.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press_maybe(enabled.then_some(message))
        };

        row![
            arrow(
                ICON_CHEVRON_LEFT,
                Message::NavigateBack,
                self.history.can_go_back()
            ),
            arrow(
                ICON_CHEVRON_RIGHT,
                Message::NavigateForward,
                self.history.can_go_forward()
            ),
        ]
        .spacing(8)
        .into()
    }

    pub fn view_main_content(&self) -> Element<'_, Message> {
        let page: Element<Message> = match self.history.current() {
            Route::Home => match &self.home_state {
                LoadingState::Loading => self.view_skeleton_home(),
                LoadingState::Error(message) => self.view_error_state(message, Message::RetryHome),
                LoadingState::Idle => column![self.view_hero_section(), self.view_home_rows()]
                    .width(Length::Fill)
                    .into(),
            },
            Route::List(_) => self.view_list_page(),
            Route::Search { .. } => self.view_search_page(),
            Route::Detail(_) => self.view_detail_page(),
        };

        let scroll = scrollable(column![page, self.view_footer()].width(Length::Fill))
            .id(iced::widget::Id::new(MAIN_SCROLL_ID))
            .direction(scrollable::Direction::Vertical(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .on_scroll(|viewport| Message::MainScrolled(viewport.absolute_offset().y))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(hidden_scrollbar_style);

        iced::widget::stack![scroll, self.view_header()]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_footer(&self) -> Element<'_, Message> {
        container(
            column![
                bold_text("MOVIEFLIX", 18, BRAND_RED),
                text("Data provided by TMDB. This product uses the TMDB API but is not endorsed or certified by TMDB.")
                    .size(12)
                    .color(TEXT_GRAY),
            ]
            .spacing(8),
        )
        .width(Length::Fill)
        .padding(Padding::new(32.0).left(48.0).right(48.0))
        .into()
    }

    pub fn view_error_state<'a>(
        &'a self,
        error_message: &'a str,
        retry: Message,
    ) -> Element<'a, Message> {
        let error_text = text(error_message).size(18).color(BRAND_RED);
        let retry_button = button(text("Retry").size(16).color(TEXT_WHITE))
            .padding(Padding::new(12.0).left(24.0).right(24.0))
            .style(solid_button_style(BRAND_RED, Color::from_rgb(0.7, 0.1, 0.1)))
            .on_press(retry);

        container(
            column![error_text, retry_button]
                .spacing(16)
                .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fixed(600.0))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(600.0))
        .into()
    }

    pub fn view_empty_state<'a>(&'a self, message: &'a str) -> Element<'a, Message> {
        container(text(message).size(16).color(TEXT_GRAY))
            .width(Length::Fill)
            .padding(Padding::new(80.0))
            .center_x(Length::Fill)
            .into()
    }

    pub fn view_skeleton_home(&self) -> Element<'_, Message> {
        let backdrop_skeleton = container(Space::new().width(Length::Fill).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fixed(560.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                ..Default::default()
            });

        let sections: Vec<Element<Message>> = (0..3).map(|_| skeleton_row()).collect();

        column![
            backdrop_skeleton,
            Column::with_children(sections)
                .spacing(32)
                .padding(Padding::new(32.0).left(48.0).right(48.0))
        ]
        .width(Length::Fill)
        .into()
    }
}

pub fn skeleton_card<'a>() -> Element<'a, Message> {
    container(Space::new().width(160.0).height(240.0))
        .style(skeleton_style(8.0))
        .into()
}

fn skeleton_row<'a>() -> Element<'a, Message> {
    let title = container(Space::new().width(180.0).height(24.0)).style(skeleton_style(4.0));
    let cards: Vec<Element<Message>> = (0..7).map(|_| skeleton_card()).collect();
    column![title, Row::with_children(cards).spacing(12)]
        .spacing(16)
        .into()
}

pub fn skeleton_style(radius: f32) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(iced::Background::Color(Color::from_rgba(
            0.2, 0.2, 0.2, 0.5,
        ))),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
