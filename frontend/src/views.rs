//! Today screen: header, scrollable hour timeline and lock button.

use crate::timeline::{BrowserClock, TodayTimeline};
use shared::{
    ScheduledEvent, TimelineScale, TimelineStatus, hour_label, split_by_day, tomorrow_summary_top,
};
use zoon::*;

const SURFACE_COLOR: &str = "#fef7ff";
const OUTLINE_COLOR: &str = "#cac4d0";
const INDICATOR_COLOR: &str = "#b3261e";
const MUTED_TEXT_COLOR: &str = "#49454f";

pub fn today_screen(timeline: &TodayTimeline, events: &[ScheduledEvent]) -> impl Element {
    let (today_events, tomorrow_events) = split_by_day(events);

    Column::new()
        .s(Width::fill())
        .s(Height::screen())
        .update_raw_el(|raw_el| raw_el.style("background-color", SURFACE_COLOR))
        .item(header(timeline))
        .item(
            Stack::new()
                .s(Width::fill())
                .s(Height::fill())
                .layer(scroll_container(timeline, today_events, tomorrow_events))
                .layer(indicator(timeline)),
        )
        .item(lock_button(timeline))
}

fn header(timeline: &TodayTimeline) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(20).y(12))
        .s(Gap::new().x(12))
        .item(title(timeline))
        .item_signal(
            timeline
                .status_actor()
                .signal()
                .map(|status| status.shows_now_card().then(|| now_card(status))),
        )
}

/// "Today" and the date, faded in while the user moves the timeline.
fn title(timeline: &TodayTimeline) -> impl Element {
    let status = timeline.status_actor();

    Column::new()
        .update_raw_el(|raw_el| {
            raw_el.style("transition", "opacity 200ms ease").style_signal(
                "opacity",
                status.signal_ref(|status| if status.header_visible() { "1" } else { "0" }),
            )
        })
        .item(
            El::new()
                .s(Font::new().size(22).weight(FontWeight::SemiBold))
                .child("Today"),
        )
        .item(
            El::new()
                .s(Font::new().size(13))
                .update_raw_el(|raw_el| raw_el.style("color", MUTED_TEXT_COLOR))
                .child(Text::with_signal(
                    status.signal_ref(|_| BrowserClock.today().to_string()),
                )),
        )
}

/// Glanceable shown while the timeline follows the clock.
fn now_card(status: TimelineStatus) -> impl Element {
    let (time, period) = status.display_time.clock_parts();
    Row::new()
        .s(Padding::new().x(12).y(6))
        .s(RoundedCorners::all(12))
        .s(Gap::new().x(6))
        .update_raw_el(|raw_el| raw_el.style("border", &format!("1px solid {OUTLINE_COLOR}")))
        .item(El::new().s(Font::new().size(13)).child("Now"))
        .item(El::new().s(Font::new().size(13).weight(FontWeight::Bold)).child(time))
        .item(El::new().s(Font::new().size(11)).child(period))
}

fn scroll_container(
    timeline: &TodayTimeline,
    today_events: Vec<ScheduledEvent>,
    tomorrow_events: Vec<ScheduledEvent>,
) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Scrollbars::y_and_clip_x())
        .update_raw_el(|raw_el| raw_el.style("scrollbar-width", "none"))
        .on_viewport_size_change({
            let viewport_resized_relay = timeline.viewport_resized_relay.clone();
            move |_width, height| viewport_resized_relay.send(f64::from(height))
        })
        .after_insert({
            let timeline = timeline.clone();
            move |container: web_sys::HtmlElement| timeline.attach_scroll_container(container)
        })
        .after_remove({
            let timeline = timeline.clone();
            move |_| timeline.detach_scroll_container()
        })
        .child(
            Stack::new()
                .s(Width::fill())
                .layer(hour_column(timeline))
                .layer(agenda_overlay(timeline, today_events, tomorrow_events)),
        )
}

/// Padding, the 24 hour blocks and padding again.
///
/// The paddings let 00:00 and 23:59 both reach the indicator.
fn hour_column(timeline: &TodayTimeline) -> impl Element {
    let scale = timeline.scale_actor();
    Column::new()
        .s(Width::fill())
        .item(El::new().s(Height::exact_signal(
            scale.signal_ref(|scale| scale.padding_top().round() as u32),
        )))
        .items((0..24u8).map(|hour| hour_block(timeline, hour)))
        .item(El::new().s(Height::exact_signal(
            scale.signal_ref(|scale| scale.padding_bottom().round() as u32),
        )))
}

/// Hour body followed by its label row; only the body is measured.
fn hour_block(timeline: &TodayTimeline, hour: u8) -> impl Element {
    let config = timeline.config();
    let min_height = config.min_hour_height.round() as u32;
    let label_height = config.hour_label_height.round() as u32;
    let label = hour_label(hour, config.use_24_hour_labels);

    Column::new()
        .s(Width::fill())
        .item(
            El::new()
                .s(Width::fill())
                .s(Height::growable().min(min_height))
                .update_raw_el(|raw_el| {
                    raw_el.style("border-top", &format!("1px solid {OUTLINE_COLOR}"))
                })
                .on_viewport_size_change({
                    let hour_block_resized_relay = timeline.hour_block_resized_relay.clone();
                    move |_width, height| hour_block_resized_relay.send((hour, f64::from(height)))
                }),
        )
        .item(
            El::new()
                .s(Width::fill())
                .s(Height::exact(label_height))
                .s(Padding::new().left(20))
                .s(Font::new().size(11).no_wrap())
                .update_raw_el(|raw_el| raw_el.style("color", MUTED_TEXT_COLOR))
                .child(label),
        )
}

/// Today's events over the hour blocks and tomorrow's summary after them.
fn agenda_overlay(
    timeline: &TodayTimeline,
    today_events: Vec<ScheduledEvent>,
    tomorrow_events: Vec<ScheduledEvent>,
) -> impl Element {
    let default_minutes = timeline.config().default_event_minutes;
    El::new()
        .s(Width::fill())
        .s(Height::fill())
        .update_raw_el(|raw_el| raw_el.style("position", "relative").style("pointer-events", "none"))
        .child_signal(timeline.scale_actor().signal().map(move |scale| {
            Column::new()
                .items(
                    today_events
                        .iter()
                        .map(|event| event_card(event, &scale, default_minutes)),
                )
                .item((!tomorrow_events.is_empty()).then(|| tomorrow_summary(&tomorrow_events, &scale)))
        }))
}

fn event_card(event: &ScheduledEvent, scale: &TimelineScale, default_minutes: u32) -> impl Element {
    let geometry = event.geometry(scale, default_minutes);
    let color = event.color.clone();

    Column::new()
        .s(Height::exact(geometry.height.round().max(1.0) as u32))
        .s(Padding::new().x(12).y(4))
        .s(RoundedCorners::all(8))
        .s(Clip::both())
        .update_raw_el(move |raw_el| {
            raw_el
                .style("position", "absolute")
                .style("top", &format!("{}px", geometry.top))
                .style("left", "72px")
                .style("right", "16px")
                .style("background-color", &color)
                .style("color", "#ffffff")
        })
        .item(El::new().s(Font::new().size(13).weight(FontWeight::SemiBold)).child(event.title.clone()))
        .item(El::new().s(Font::new().size(11)).child(event.time_range_label()))
}

fn tomorrow_summary(events: &[ScheduledEvent], scale: &TimelineScale) -> impl Element {
    let top = tomorrow_summary_top(scale);

    Column::new()
        .s(Padding::new().x(20).y(16))
        .s(Gap::new().y(6))
        .update_raw_el(move |raw_el| {
            raw_el
                .style("position", "absolute")
                .style("top", &format!("{top}px"))
                .style("left", "0")
                .style("right", "0")
        })
        .item(
            El::new()
                .s(Font::new().size(15).weight(FontWeight::SemiBold))
                .child("Tomorrow"),
        )
        .items(events.iter().map(|event| {
            Row::new()
                .s(Gap::new().x(8))
                .s(Font::new().size(13))
                .item(
                    El::new()
                        .update_raw_el(|raw_el| raw_el.style("color", MUTED_TEXT_COLOR))
                        .child(event.time_range_label()),
                )
                .item(El::new().child(event.title.clone()))
        }))
}

/// Fixed line at the indicator offset; grows a time chip while the user scrolls.
fn indicator(timeline: &TodayTimeline) -> impl Element {
    let scale = timeline.scale_actor();
    let status = timeline.status_actor();

    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .update_raw_el(|raw_el| raw_el.style("pointer-events", "none"))
        .item(El::new().s(Height::exact_signal(
            scale.signal_ref(|scale| scale.indicator_offset().round() as u32),
        )))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Transform::new().move_up(1))
                .s(Gap::new().x(8))
                .item(
                    El::new()
                        .s(Width::fill())
                        .s(Height::exact(2))
                        .update_raw_el(|raw_el| raw_el.style("background-color", INDICATOR_COLOR)),
                )
                .item_signal(status.signal().map(|status| {
                    status.indicator_expanded().then(|| time_chip(status))
                })),
        )
}

fn time_chip(status: TimelineStatus) -> impl Element {
    let (time, period) = status.display_time.clock_parts();
    Row::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(10))
        .s(Gap::new().x(4))
        .s(Transform::new().move_up(12))
        .update_raw_el(|raw_el| {
            raw_el
                .style("background-color", INDICATOR_COLOR)
                .style("color", "#ffffff")
        })
        .item(El::new().s(Font::new().size(14).weight(FontWeight::Bold)).child(time))
        .item(El::new().s(Font::new().size(11)).child(period))
}

fn lock_button(timeline: &TodayTimeline) -> impl Element {
    let lock_button_pressed_relay = timeline.lock_button_pressed_relay.clone();
    let status = timeline.status_actor();

    El::new()
        .s(Width::fill())
        .s(Padding::all(16))
        .child(
            Button::new()
                .s(Align::center())
                .s(Padding::new().x(20).y(10))
                .s(RoundedCorners::all(20))
                .update_raw_el(|raw_el| {
                    raw_el.style("border", &format!("1px solid {OUTLINE_COLOR}"))
                })
                .label(Text::with_signal(
                    status.signal_ref(|status| status.lock_button_label()),
                ))
                .on_press(move || lock_button_pressed_relay.send(())),
        )
}
