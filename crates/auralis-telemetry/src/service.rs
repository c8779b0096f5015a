// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame counters and their periodic summary.

use serde::Serialize;

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TelemetrySnapshot {
    /// Frames that went through the render path.
    pub frames: u64,
    /// Frames the compositor asked not to render.
    pub idle_frames: u64,
    /// Views drawn and submitted.
    pub rendered_views: u64,
    /// Views skipped after a failure.
    pub dropped_views: u64,
    /// Presets skipped by the performance governor.
    pub auto_skips: u64,
    /// Latest smoothed frame rate.
    pub smoothed_fps: Option<f64>,
    /// Audio frames waiting in the ingestion buffer.
    pub audio_queue_frames: usize,
}

/// Collects frame counters and decides when to report them.
#[derive(Debug)]
pub struct FrameTelemetry {
    totals: TelemetrySnapshot,
    last_report: Option<f64>,
    frames_at_last_report: u64,
    report_interval: f64,
}

impl FrameTelemetry {
    /// Creates a collector reporting every `report_interval` seconds.
    pub fn new(report_interval: f64) -> Self {
        Self {
            totals: TelemetrySnapshot::default(),
            last_report: None,
            frames_at_last_report: 0,
            report_interval,
        }
    }

    /// Counts a rendered frame and the fate of its views.
    pub fn record_frame(&mut self, rendered_views: usize, dropped_views: usize) {
        self.totals.frames += 1;
        self.totals.rendered_views += rendered_views as u64;
        self.totals.dropped_views += dropped_views as u64;
    }

    /// Counts a frame the compositor asked not to render.
    pub fn record_idle_frame(&mut self) {
        self.totals.idle_frames += 1;
    }

    /// Counts a governor skip.
    pub fn record_auto_skip(&mut self) {
        self.totals.auto_skips += 1;
    }

    /// Updates the gauges.
    pub fn set_gauges(&mut self, smoothed_fps: Option<f64>, audio_queue_frames: usize) {
        self.totals.smoothed_fps = smoothed_fps;
        self.totals.audio_queue_frames = audio_queue_frames;
    }

    /// Should be called once per frame.
    ///
    /// Returns `true` when a report interval has passed; the caller then
    /// logs [`summary`](Self::summary). The first call only starts the
    /// interval.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(last) = self.last_report else {
            self.last_report = Some(now);
            return false;
        };
        if now - last >= self.report_interval {
            log::trace!("Telemetry interval elapsed.");
            self.last_report = Some(now);
            true
        } else {
            false
        }
    }

    /// One log line describing the interval that just ended.
    pub fn summary(&mut self) -> String {
        let interval_frames = self.totals.frames - self.frames_at_last_report;
        self.frames_at_last_report = self.totals.frames;
        let fps = self
            .totals
            .smoothed_fps
            .map_or_else(|| "n/a".to_string(), |fps| format!("{fps:.1}"));
        format!(
            "{interval_frames} frames ({fps} FPS), views {}/{} dropped, {} auto-skips, {} audio frames queued",
            self.totals.dropped_views,
            self.totals.rendered_views + self.totals.dropped_views,
            self.totals.auto_skips,
            self.totals.audio_queue_frames,
        )
    }

    /// The totals so far.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.totals
    }

    /// The totals as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.totals)
    }
}

impl Default for FrameTelemetry {
    fn default() -> Self {
        Self::new(5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_fires_once_per_interval() {
        let mut telemetry = FrameTelemetry::new(5.0);
        assert!(!telemetry.tick(0.0));
        assert!(!telemetry.tick(4.9));
        assert!(telemetry.tick(5.0));
        assert!(!telemetry.tick(6.0));
        assert!(telemetry.tick(10.5));
    }

    #[test]
    fn counters_accumulate() {
        let mut telemetry = FrameTelemetry::default();
        telemetry.record_frame(2, 0);
        telemetry.record_frame(1, 1);
        telemetry.record_idle_frame();
        telemetry.record_auto_skip();
        telemetry.set_gauges(Some(71.5), 512);

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.frames, 2);
        assert_eq!(snapshot.rendered_views, 3);
        assert_eq!(snapshot.dropped_views, 1);
        assert_eq!(snapshot.idle_frames, 1);
        assert_eq!(snapshot.auto_skips, 1);
        assert_eq!(snapshot.smoothed_fps, Some(71.5));
    }

    #[test]
    fn summary_counts_frames_since_last_report() {
        let mut telemetry = FrameTelemetry::default();
        telemetry.record_frame(2, 0);
        telemetry.record_frame(2, 0);
        assert!(telemetry.summary().starts_with("2 frames"));
        telemetry.record_frame(2, 0);
        let line = telemetry.summary();
        assert!(line.starts_with("1 frames"), "{line}");
        assert!(line.contains("views 0/6 dropped"), "{line}");
    }

    #[test]
    fn json_report_names_every_counter() {
        let telemetry = FrameTelemetry::default();
        let json = telemetry.to_json().unwrap();
        for key in ["frames", "dropped_views", "auto_skips", "smoothed_fps"] {
            assert!(json.contains(key), "{json}");
        }
    }
}
