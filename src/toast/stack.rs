// SPDX-License-Identifier: MPL-2.0
//! Toast stack widget: draws a slot's children as stacked cards.

use super::tokens;
use super::{Message, Toast};
use crate::config::{Config, DEFAULT_TOAST_PADDING, DEFAULT_TOAST_SPACING, DEFAULT_TOAST_WIDTH};
use crate::relocation::Child;
use iced::widget::{button, container, text, Column, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// Placement of the toast stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastLayout {
    /// Gap between stacked toasts.
    pub spacing: f32,
    /// Distance from the window edges.
    pub padding: f32,
    /// Width of one toast card.
    pub width: f32,
}

impl Default for ToastLayout {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_TOAST_SPACING,
            padding: DEFAULT_TOAST_PADDING,
            width: DEFAULT_TOAST_WIDTH,
        }
    }
}

impl ToastLayout {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            spacing: config.toast_spacing(),
            padding: config.toast_padding(),
            width: config.toast_width(),
        }
    }
}

/// Toast stack rendering.
pub struct ToastStack;

impl ToastStack {
    /// Renders `children` stacked in the bottom-right corner, first
    /// registered on top.
    ///
    /// An empty slot renders as a zero-size element.
    /// The produced element does not borrow `children`, so a consumer can
    /// render straight from [`Registry::with_slot`](crate::Registry::with_slot).
    pub fn view<'a, T, M: 'a>(
        children: &[Child<T>],
        layout: &ToastLayout,
        render: impl Fn(&Child<T>) -> Element<'a, M>,
    ) -> Element<'a, M> {
        let toasts: Vec<Element<'a, M>> = children.iter().map(render).collect();

        if toasts.is_empty() {
            Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into()
        } else {
            let toast_column = Column::with_children(toasts)
                .spacing(layout.spacing)
                .align_x(alignment::Horizontal::Right);

            Container::new(toast_column)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(alignment::Horizontal::Right)
                .align_y(alignment::Vertical::Bottom)
                .padding(layout.padding)
                .into()
        }
    }

    /// Renders a plain-text toast with a dismiss button.
    pub fn text_toast<'a>(child: &Child<Toast<String>>, width: f32) -> Element<'a, Message> {
        let message_widget = Text::new(child.content().render().clone())
            .size(tokens::TEXT_SIZE)
            .style(|theme: &Theme| text::Style {
                color: Some(theme.palette().text),
            });

        let dismiss_button = button(text("×").size(tokens::TEXT_SIZE))
            .on_press(Message::Dismiss(child.id()))
            .padding(tokens::BUTTON_PADDING)
            .style(dismiss_button_style);

        // Layout: [message] [dismiss]
        let content = Row::new()
            .spacing(tokens::GAP)
            .align_y(alignment::Vertical::Center)
            .push(
                Container::new(message_widget)
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Left),
            )
            .push(dismiss_button);

        Container::new(content)
            .width(Length::Fixed(width))
            .padding(tokens::PADDING)
            .style(toast_container_style)
            .into()
    }
}

/// Style function for the toast container.
fn toast_container_style(theme: &Theme) -> container::Style {
    let bg_color = theme.extended_palette().background.base.color;

    container::Style {
        background: Some(iced::Background::Color(bg_color)),
        border: iced::Border {
            color: theme.palette().primary,
            width: tokens::BORDER_WIDTH,
            radius: tokens::RADIUS.into(),
        },
        shadow: tokens::SHADOW,
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

/// Style function for the dismiss button.
fn dismiss_button_style(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let highlighted = |alpha: f32| button::Style {
        background: Some(iced::Background::Color(Color { a: alpha, ..base.text })),
        text_color: base.text,
        border: iced::Border {
            radius: tokens::BUTTON_RADIUS.into(),
            ..Default::default()
        },
        shadow: tokens::NO_SHADOW,
        snap: true,
    };

    match status {
        button::Status::Active => button::Style {
            background: None,
            text_color: base.text,
            border: iced::Border::default(),
            shadow: tokens::NO_SHADOW,
            snap: true,
        },
        button::Status::Hovered => highlighted(tokens::HOVER_ALPHA),
        button::Status::Pressed => highlighted(tokens::PRESSED_ALPHA),
        button::Status::Disabled => button::Style {
            background: None,
            text_color: Color {
                a: tokens::PRESSED_ALPHA,
                ..base.text
            },
            border: iced::Border::default(),
            shadow: tokens::NO_SHADOW,
            snap: true,
        },
    }
}
