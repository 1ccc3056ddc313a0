use iced::widget::{container, Space};
use iced::{Element, Length, Padding};

use crate::components::HEADER_HEIGHT;
use crate::media::{DetailSlot, Message};
use crate::Movieflix;

impl Movieflix {
    /// Standalone title page; same body as the modal, laid into the main scroll.
    pub fn view_detail_page(&self) -> Element<'_, Message> {
        container(iced::widget::column![
            Space::new().height(HEADER_HEIGHT),
            self.view_detail_body(DetailSlot::Page, &self.page_detail)
        ])
        .width(Length::Fill)
        .max_width(1200.0)
        .padding(Padding::new(0.0).left(48.0).right(48.0).top(24.0))
        .center_x(Length::Fill)
        .into()
    }
}
