use crate::display::{FixGlyph, MarkerIcon, Overlay, RenderCommand};
use crate::feed::TelemetrySample;
use crate::prelude::ReduceResult;
use crate::reducer::{DisplayState, MarkerPhase};

/// Minimum spacing between view recenters after the first one.
pub const RECENTER_INTERVAL_MS: u64 = 5_000;

/// Next state plus the commands that bring the display in line with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub state: DisplayState,
    pub commands: Vec<RenderCommand>,
}

/// Reduces one raw feed payload. On error the caller keeps its old state.
pub fn reduce(state: &DisplayState, payload: &[u8], now_ms: u64) -> ReduceResult<Reduction> {
    let sample = TelemetrySample::from_payload(payload)?;
    Ok(apply_sample(state, &sample, now_ms))
}

pub fn apply_sample(state: &DisplayState, sample: &TelemetrySample, now_ms: u64) -> Reduction {
    let mut next = *state;
    let mut commands = vec![
        RenderCommand::SetOverlay(Overlay::from_sample(sample)),
        RenderCommand::SetFixIcon {
            glyph: FixGlyph::from_flag(&sample.is_real_fix),
        },
    ];

    if !next.gps_ready_seen {
        next.gps_ready_seen = true;
        commands.push(RenderCommand::HideLoading);
    }

    let position = sample.position();
    let icon = MarkerIcon::with_rotation(sample.heading);
    match next.marker {
        MarkerPhase::Absent => {
            commands.push(RenderCommand::CreateMarker { position, icon });
            commands.push(RenderCommand::PanTo { position });
            next.marker = MarkerPhase::Present;
            next.last_pan_ms = Some(now_ms);
        }
        MarkerPhase::Present => {
            commands.push(RenderCommand::MoveMarker { position, icon });
            if next.recenter_due(now_ms, RECENTER_INTERVAL_MS) {
                commands.push(RenderCommand::PanTo { position });
                next.last_pan_ms = Some(now_ms);
            }
        }
    }
    next.last_known_position = Some(position);

    Reduction {
        state: next,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use crate::prelude::ReduceError;

    fn payload(lat: f64, lon: f64) -> Vec<u8> {
        format!(
            r#"{{"lat":{lat},"lon":{lon},"heading":90,"speed":25.55,"hdop":1.2,"vdop":2.4,"altitude":300.2,"sats":10,"fix":"3D","actual":"true"}}"#
        )
        .into_bytes()
    }

    fn pans(commands: &[RenderCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::PanTo { .. }))
            .count()
    }

    #[test]
    fn first_sample_creates_marker_and_pans() {
        let reduction = reduce(&DisplayState::new(), &payload(40.0, -105.0), 1_000).unwrap();
        let position = LatLon::new(40.0, -105.0);

        assert!(matches!(reduction.commands[0], RenderCommand::SetOverlay(_)));
        assert_eq!(
            reduction.commands[1],
            RenderCommand::SetFixIcon {
                glyph: FixGlyph::RealFix
            }
        );
        assert_eq!(reduction.commands[2], RenderCommand::HideLoading);
        assert_eq!(
            reduction.commands[3],
            RenderCommand::CreateMarker {
                position,
                icon: MarkerIcon::with_rotation(90.0)
            }
        );
        assert_eq!(reduction.commands[4], RenderCommand::PanTo { position });
        assert_eq!(reduction.state.marker, MarkerPhase::Present);
        assert_eq!(reduction.state.last_pan_ms, Some(1_000));
        assert_eq!(reduction.state.last_known_position, Some(position));
        assert!(reduction.state.gps_ready_seen);
    }

    #[test]
    fn later_samples_move_without_hiding_loading_again() {
        let first = reduce(&DisplayState::new(), &payload(40.0, -105.0), 0).unwrap();
        let second = reduce(&first.state, &payload(40.001, -105.0), 100).unwrap();

        assert!(!second.commands.contains(&RenderCommand::HideLoading));
        assert!(second
            .commands
            .iter()
            .all(|c| !matches!(c, RenderCommand::CreateMarker { .. })));
        assert!(second
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::MoveMarker { .. })));
    }

    #[test]
    fn recenter_is_throttled_after_first_pan() {
        let first = reduce(&DisplayState::new(), &payload(40.0, -105.0), 10_000).unwrap();
        let soon = reduce(&first.state, &payload(40.0001, -105.0), 10_100).unwrap();
        assert_eq!(pans(&soon.commands), 0);
        assert_eq!(soon.state.last_pan_ms, Some(10_000));
        assert_eq!(soon.state.last_known_position, Some(LatLon::new(40.0001, -105.0)));

        let later = reduce(&soon.state, &payload(40.0002, -105.0), 16_100).unwrap();
        assert_eq!(pans(&later.commands), 1);
        assert_eq!(later.state.last_pan_ms, Some(16_100));
    }

    #[test]
    fn recenter_window_is_inclusive() {
        let first = reduce(&DisplayState::new(), &payload(1.0, 1.0), 0).unwrap();
        let edge = reduce(&first.state, &payload(1.0, 1.0), RECENTER_INTERVAL_MS - 1).unwrap();
        assert_eq!(pans(&edge.commands), 0);
        let due = reduce(&edge.state, &payload(1.0, 1.0), RECENTER_INTERVAL_MS).unwrap();
        assert_eq!(pans(&due.commands), 1);
    }

    #[test]
    fn rejected_payload_produces_no_reduction() {
        let state = DisplayState::new();
        let err = reduce(&state, br#"{"lon":-105.0,"speed":3}"#, 0).unwrap_err();
        assert!(matches!(err, ReduceError::MissingCoordinates { .. }));
        assert!(reduce(&state, b"not json", 0).is_err());
    }

    #[test]
    fn clock_going_backwards_does_not_recenter() {
        let first = reduce(&DisplayState::new(), &payload(1.0, 1.0), 50_000).unwrap();
        let back = reduce(&first.state, &payload(1.0, 1.0), 10).unwrap();
        assert_eq!(pans(&back.commands), 0);
    }
}
