//! Unit tests for vx-output.

use vx_core::{GroupId, SimTime};

use crate::{ChannelSampleRow, PacketRow, SampleLayout, TraceWriter, TsvTrace};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn text(trace: TsvTrace<Vec<u8>>) -> String {
    String::from_utf8(trace.into_inner().unwrap()).unwrap()
}

fn sample(time: SimTime) -> ChannelSampleRow<'static> {
    ChannelSampleRow {
        time,
        speed_kmh:         60.0,
        rain:              50.0,
        path_loss:         84.25,
        distance:          20.0,
        weather_att:       0.5,
        weather_cond:      2,
        scenario:          "V2V-Urban",
        k:                 0.8606,
        alpha:             0.7656,
        channel_condition: "nlos-v",
        period:            SimTime::from_millis(100),
    }
}

#[cfg(test)]
mod packet_lines {
    use super::*;

    #[test]
    fn tx_line_has_three_fields() {
        let mut t = TsvTrace::new(Vec::new());
        t.write_packet(&PacketRow::tx(GroupId(0), SimTime::from_millis(10), 512)).unwrap();
        assert_eq!(text(t), "Tx\t0.01\t512\n");
    }

    #[test]
    fn rx_line_with_and_without_delay() {
        let mut t = TsvTrace::new(Vec::new());
        let g = GroupId(1);
        t.write_packet(&PacketRow::rx(g, SimTime::from_secs(1), 512, Some(1_234))).unwrap();
        t.write_packet(&PacketRow::rx(g, SimTime::from_secs(2), 100, None)).unwrap();
        assert_eq!(t.lines(), 2);
        assert_eq!(text(t), "Rx\t1\t512\t1234\nRx\t2\t100\n");
    }

    #[test]
    fn lines_appear_in_write_order() {
        let mut t = TsvTrace::new(Vec::new());
        let g = GroupId(0);
        for ms in [30, 10, 20] {
            t.write_packet(&PacketRow::tx(g, SimTime::from_millis(ms), 1)).unwrap();
        }
        let out = text(t);
        let times: Vec<&str> = out.lines().map(|l| l.split('\t').nth(1).unwrap()).collect();
        assert_eq!(times, ["0.03", "0.01", "0.02"]);
    }
}

#[cfg(test)]
mod sample_lines {
    use super::*;

    #[test]
    fn extended_layout_has_twelve_columns() {
        let mut t = TsvTrace::new(Vec::new());
        t.write_sample(&sample(SimTime::from_millis(100)), SampleLayout::Extended).unwrap();
        assert_eq!(
            text(t),
            "0.1\t60\t50\t84.25\t20\t0.5\t2\tV2V-Urban\t50\t0.8606\t0.7656\tnlos-v\n"
        );
    }

    #[test]
    fn compact_layout_has_five_columns() {
        let mut t = TsvTrace::new(Vec::new());
        t.write_sample(&sample(SimTime::from_secs(3)), SampleLayout::Compact).unwrap();
        assert_eq!(text(t), "3\t84.25\t20\t0.5\t0.1\n");
    }

    #[test]
    fn layout_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SampleLayout::Compact).unwrap(), "\"compact\"");
        let parsed: SampleLayout = serde_json::from_str("\"extended\"").unwrap();
        assert_eq!(parsed, SampleLayout::Extended);
    }
}

#[cfg(test)]
mod files {
    use super::*;

    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn trace_file_is_flushed_by_finish() {
        let dir = tmp();
        let path = dir.path().join("group-1.txt");
        let mut t = TsvTrace::new(std::fs::File::create(&path).unwrap());
        t.write_packet(&PacketRow::tx(GroupId(0), SimTime::ZERO, 512)).unwrap();
        t.finish().unwrap();
        t.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Tx\t0\t512\n");
    }

    #[test]
    fn json_report_round_trip() {
        #[derive(serde::Serialize)]
        struct Summary {
            tx: u64,
            rx: u64,
        }
        let dir = tmp();
        let path = dir.path().join("summary.json");
        crate::write_json(&path, &Summary { tx: 10, rx: 9 }).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["tx"], 10);
        assert_eq!(v["rx"], 9);
    }
}
