use gpstrackcore::diagnostics::MetricsSnapshot;
use gpstrackcore::display::{DisplayModel, OverlaySegment};
use gpstrackcore::geo::MapType;
use iced::{
    time,
    widget::{column, row, text, Canvas, Container, Row},
    Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use map_surface::MapSurface;
use std::time::Duration;

mod map_surface;

const DEFAULT_BRIDGE: &str = "http://127.0.0.1:9000";
const LOADING_GLYPH: &str = "\u{1F4E1}";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(state: &Visualizer) -> String {
    format!("GPS Track ({})", state.map_type())
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(250)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    bridge: String,
    /// Set only when a query was given on the command line.
    query_map_type: Option<MapType>,
    model: Option<DisplayModel>,
    metrics: Option<MetricsSnapshot>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ModelFetched(Result<DisplayModel, String>),
    MetricsFetched(Result<MetricsSnapshot, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let query = std::env::args().nth(1);
        let bridge = std::env::var("GPSTRACK_BRIDGE").unwrap_or_else(|_| DEFAULT_BRIDGE.into());
        let state = Visualizer {
            query_map_type: query.as_deref().map(|q| MapType::from_query(Some(q))),
            bridge,
            model: None,
            metrics: None,
            status: "Waiting for GPS fix...".into(),
        };
        let task = Task::perform(fetch_model(state.bridge.clone()), Message::ModelFetched);
        (state, task)
    }

    /// The command-line query wins; otherwise the tracker's choice from the bridge.
    fn map_type(&self) -> MapType {
        surface_map_type(self.query_map_type, self.model.as_ref())
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::batch([
                Task::perform(fetch_model(state.bridge.clone()), Message::ModelFetched),
                Task::perform(fetch_metrics(state.bridge.clone()), Message::MetricsFetched),
            ]),
            Message::ModelFetched(Ok(model)) => {
                if model.loading_visible {
                    state.status = "Waiting for GPS fix...".into();
                } else if let Some(marker) = &model.marker {
                    state.status = format!(
                        "Vehicle at {} heading {:.0}\u{B0}",
                        marker.position, marker.icon.rotation
                    );
                }
                state.model = Some(model);
                Task::none()
            }
            Message::ModelFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::MetricsFetched(Ok(metrics)) => {
                state.metrics = Some(metrics);
                Task::none()
            }
            Message::MetricsFetched(Err(_)) => Task::none(),
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let model = match &state.model {
            Some(model) if !model.loading_visible => model,
            _ => return loading_screen(&state.status),
        };

        let overlay = model
            .overlay
            .as_ref()
            .map(|overlay| overlay_row(&overlay.segments()))
            .unwrap_or_else(|| Row::new().push(text("No telemetry").size(14)));
        let fix_icon = text(model.fix_glyph.map(|g| g.glyph()).unwrap_or_default()).size(24);

        let header = row![
            Container::new(overlay).width(Length::Fill).padding(6),
            fix_icon
        ]
        .align_y(Alignment::Center)
        .padding(10);

        let map = Canvas::new(MapSurface::new(state.map_type(), model))
            .width(Length::Fill)
            .height(Length::Fill);

        let footer = match &state.metrics {
            Some(metrics) => format!(
                "{} | messages {} rendered {} dropped {}",
                state.status,
                metrics.received,
                metrics.rendered,
                metrics.dropped()
            ),
            None => state.status.clone(),
        };

        column![header, map, text(footer).size(12)]
            .spacing(6)
            .padding(8)
            .into()
    }
}

fn surface_map_type(query: Option<MapType>, model: Option<&DisplayModel>) -> MapType {
    query
        .or_else(|| model.map(|model| model.map_type))
        .unwrap_or_default()
}

fn overlay_row(segments: &[OverlaySegment]) -> Row<'static, Message> {
    segments
        .iter()
        .enumerate()
        .fold(Row::new().spacing(6), |row, (idx, segment)| {
            let row = if idx > 0 {
                row.push(text("|").size(14))
            } else {
                row
            };
            let label = text(segment.text.clone()).size(14);
            match segment.tier {
                Some(tier) => {
                    let (r, g, b) = tier.rgb();
                    row.push(label.color(Color::from_rgb8(r, g, b)))
                }
                None => row.push(label),
            }
        })
}

fn loading_screen(status: &str) -> Element<'_, Message> {
    let content = column![
        text(LOADING_GLYPH)
            .size(80)
            .color(Color::from_rgb8(0x00, 0xff, 0x00)),
        text(status).size(14),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

async fn fetch_model(bridge: String) -> Result<DisplayModel, String> {
    let response = reqwest::get(format!("{bridge}/display"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<DisplayModel>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_metrics(bridge: String) -> Result<MetricsSnapshot, String> {
    let response = reqwest::get(format!("{bridge}/metrics"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<MetricsSnapshot>()
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_map_type_applies_without_query() {
        let model = DisplayModel::new(MapType::Satellite);
        assert_eq!(surface_map_type(None, Some(&model)), MapType::Satellite);
    }

    #[test]
    fn query_overrides_bridge_map_type() {
        let model = DisplayModel::new(MapType::Satellite);
        let query = Some(MapType::from_query(Some("map=hybrid")));
        assert_eq!(surface_map_type(query, Some(&model)), MapType::Hybrid);
    }

    #[test]
    fn terrain_before_first_model() {
        assert_eq!(surface_map_type(None, None), MapType::Terrain);
    }
}
