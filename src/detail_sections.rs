use iced::widget::{button, column, container, row, text, Column, Row, Space};
use iced::{Color, Element, Length, Padding};

use crate::components::{
    bold_text, horizontal_scroll, pill_button_style, rounded_style, skeleton_style, ICON_FILM,
    ICON_PERSON_FILL,
};
use crate::detail::{DetailLoader, SeasonState};
use crate::detail_popup::format_full_date;
use crate::media::{
    truncate_description, CastMember, DetailSlot, Episode, ListItem, Message, TEXT_GRAY,
    TEXT_WHITE,
};
use crate::tmdb::ImageSize;
use crate::Movieflix;

const EPISODE_WIDTH: f32 = 240.0;
const EPISODE_STILL_HEIGHT: f32 = 135.0;

pub fn format_episode_number(season: u32, episode: u32) -> String {
    format!("S{} E{}", season, episode)
}

impl Movieflix {
    pub fn view_detail_seasons_section<'a>(
        &'a self,
        slot: DetailSlot,
        loader: &'a DetailLoader,
    ) -> Element<'a, Message> {
        let selected = loader.selected_season();
        let tabs: Vec<Element<Message>> = loader
            .season_tabs()
            .into_iter()
            .map(|season| {
                let label = if season.name.is_empty() {
                    format!("Season {}", season.season_number)
                } else {
                    season.name.clone()
                };
                button(text(label).size(13))
                    .padding(Padding::new(6.0).left(14.0).right(14.0))
                    .style(pill_button_style(season.season_number == selected))
                    .on_press(Message::SelectSeason(slot, season.season_number))
                    .into()
            })
            .collect();

        let episodes: Element<Message> = match loader.season_state() {
            SeasonState::Idle => Space::new().height(0).into(),
            SeasonState::Loading(_) => {
                let placeholders: Vec<Element<Message>> = (0..4)
                    .map(|_| {
                        container(
                            Space::new()
                                .width(EPISODE_WIDTH)
                                .height(EPISODE_STILL_HEIGHT),
                        )
                        .style(skeleton_style(4.0))
                        .into()
                    })
                    .collect();
                Row::with_children(placeholders).spacing(12).into()
            }
            SeasonState::Failed(_) => container(text("No episodes available").size(14).color(TEXT_GRAY))
                .padding(16.0)
                .into(),
            SeasonState::Loaded(season) if season.episodes.is_empty() => {
                container(text("No episodes available").size(14).color(TEXT_GRAY))
                    .padding(16.0)
                    .into()
            }
            SeasonState::Loaded(season) => {
                let cards: Vec<Element<Message>> = season
                    .episodes
                    .iter()
                    .map(|episode| self.view_episode_card(episode))
                    .collect();
                horizontal_scroll(
                    Row::with_children(cards)
                        .spacing(12)
                        .align_y(iced::Alignment::Start),
                )
            }
        };

        container(
            column![
                bold_text("Seasons", 18, TEXT_WHITE),
                Row::with_children(tabs).spacing(8).wrap(),
                episodes
            ]
            .spacing(20)
            .width(Length::Fill),
        )
        .width(Length::Fill)
        .padding(Padding::new(32.0))
        .style(|_| rounded_style(0.0, Some(Color::from_rgba(1.0, 1.0, 1.0, 0.03))))
        .into()
    }

    fn view_episode_card<'a>(&'a self, episode: &'a Episode) -> Element<'a, Message> {
        let still = Self::image_or_placeholder(
            self.cached_image(episode.still_path.as_ref(), ImageSize::Still),
            EPISODE_WIDTH,
            EPISODE_STILL_HEIGHT,
            4.0,
            ICON_FILM,
        );

        let air_date = episode
            .air_date
            .as_deref()
            .map(format_full_date)
            .unwrap_or_default();
        let meta = row![
            bold_text(
                format_episode_number(episode.season_number, episode.episode_number),
                13,
                TEXT_WHITE
            ),
            text(air_date).size(12).color(TEXT_GRAY)
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let title = text(&episode.name)
            .size(14)
            .color(TEXT_WHITE)
            .wrapping(text::Wrapping::Word);

        let mut body = column![still, meta, title].spacing(6);
        if !episode.overview.is_empty() {
            body = body.push(
                text(truncate_description(&episode.overview, 120))
                    .size(12)
                    .color(TEXT_GRAY),
            );
        }

        container(body.width(Length::Fixed(EPISODE_WIDTH)))
            .width(Length::Fixed(EPISODE_WIDTH))
            .into()
    }

    pub fn view_detail_cast_section<'a>(&'a self, cast: &'a [CastMember]) -> Element<'a, Message> {
        if cast.is_empty() {
            return Space::new().width(Length::FillPortion(1)).into();
        }

        let list: Vec<Element<Message>> = cast
            .iter()
            .map(|member| {
                let profile = Self::image_or_placeholder(
                    self.cached_image(member.profile_path.as_ref(), ImageSize::Profile),
                    50.0,
                    50.0,
                    25.0,
                    ICON_PERSON_FILL,
                );
                row![
                    profile,
                    column![
                        bold_text(&member.name, 14, TEXT_WHITE),
                        text(&member.character).size(12).color(TEXT_GRAY)
                    ]
                    .spacing(2)
                ]
                .spacing(12)
                .align_y(iced::Alignment::Center)
                .into()
            })
            .collect();

        column![
            bold_text("Top Cast", 16, TEXT_WHITE),
            Column::with_children(list).spacing(16)
        ]
        .spacing(16)
        .width(Length::FillPortion(1))
        .into()
    }

    pub fn view_detail_recommendations<'a>(
        &'a self,
        items: &'a [ListItem],
    ) -> Element<'a, Message> {
        let cards: Vec<Element<Message>> = items
            .iter()
            .map(|item| self.view_poster_card(item, false))
            .collect();

        container(
            column![
                bold_text("More Like This", 18, TEXT_WHITE),
                horizontal_scroll(Row::with_children(cards).spacing(12))
            ]
            .spacing(20)
            .width(Length::Fill),
        )
        .width(Length::Fill)
        .padding(Padding::new(32.0))
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_numbers_read_season_first() {
        assert_eq!(format_episode_number(2, 7), "S2 E7");
    }
}
