//! Host-level tests for particulate frame reassembly and resync.

#![expect(
    clippy::indexing_slicing,
    reason = "Offsets into the fixed-size test frame are in range."
)]

use airclock::particulate::{FRAME_LEN, FrameAssembler, PmFrames, PmReading};

/// A well-formed frame carrying the given concentrations.
fn golden_frame(pm1_0: u16, pm2_5: u16, pm10_0: u16) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = 0x42;
    frame[1] = 0x4D;
    frame[4..6].copy_from_slice(&pm1_0.to_be_bytes());
    frame[6..8].copy_from_slice(&pm2_5.to_be_bytes());
    frame[8..10].copy_from_slice(&pm10_0.to_be_bytes());
    frame
}

fn feed(assembler: &mut FrameAssembler, bytes: &[u8]) -> Vec<PmReading> {
    bytes
        .iter()
        .filter_map(|&byte| assembler.push_byte(byte))
        .collect()
}

#[test]
fn complete_frame_yields_one_reading() {
    let mut assembler = FrameAssembler::new();
    let readings = feed(&mut assembler, &golden_frame(5, 12, 18));
    assert_eq!(
        readings,
        vec![PmReading {
            pm1_0: 5,
            pm2_5: 12,
            pm10_0: 18,
        }]
    );
}

#[test]
fn garbage_between_frames_is_discarded_silently() {
    let mut assembler = FrameAssembler::new();
    assert!(feed(&mut assembler, &[0x00, 0xFF, 0x42, 0x00, 0x37]).is_empty());
    let readings = feed(&mut assembler, &golden_frame(1, 2, 3));
    assert_eq!(readings.len(), 1);
}

#[test]
fn stray_header_byte_resyncs_onto_the_real_frame() {
    let mut assembler = FrameAssembler::new();
    // A lone 0x42 followed by a full frame: the frame's own header byte
    // restarts the hunt rather than being swallowed as payload.
    let mut stream = vec![0x42];
    stream.extend_from_slice(&golden_frame(7, 8, 9));
    let readings = feed(&mut assembler, &stream);
    assert_eq!(
        readings,
        vec![PmReading {
            pm1_0: 7,
            pm2_5: 8,
            pm10_0: 9,
        }]
    );
}

#[test]
fn back_to_back_frames_parse_independently() {
    let mut assembler = FrameAssembler::new();
    let mut stream = Vec::new();
    stream.extend_from_slice(&golden_frame(1, 1, 1));
    stream.extend_from_slice(&golden_frame(2, 2, 2));
    let readings = feed(&mut assembler, &stream);
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[1].pm2_5, 2);
}

#[test]
fn frame_signal_coalesces_to_newest() {
    let frames: PmFrames = PmFrames::new();
    frames.signal(PmReading {
        pm1_0: 1,
        pm2_5: 1,
        pm10_0: 1,
    });
    frames.signal(PmReading {
        pm1_0: 2,
        pm2_5: 2,
        pm10_0: 2,
    });

    // Two completed frames while the consumer was busy collapse into the
    // newest; nothing queues.
    assert_eq!(
        frames.try_take(),
        Some(PmReading {
            pm1_0: 2,
            pm2_5: 2,
            pm10_0: 2,
        })
    );
    assert_eq!(frames.try_take(), None);
}
