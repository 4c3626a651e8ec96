//! Terminal capture surface
//!
//! Line-based implementation of [`QrCapture`] for keyboard-wedge QR scanners
//! (or manual entry): each non-command input line is one decoded payload,
//! `c` confirms the earliest pending payload, `q` quits, and end-of-input
//! ends the session. Status changes are printed between frames in place of a
//! video overlay.

use crate::detection::ScanStatus;
use crate::error::Result;
use crate::session::{Detection, FrameScan, QrCapture, ScanKey};
use std::io::BufRead;

pub struct TerminalCapture<R> {
    input: R,
    last_status: Option<ScanStatus>,
}

impl TerminalCapture<std::io::BufReader<std::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead> TerminalCapture<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            last_status: None,
        }
    }

    fn show_status(&mut self, status: ScanStatus) {
        if self.last_status == Some(status) {
            return;
        }
        self.last_status = Some(status);
        match status {
            ScanStatus::Idle => {
                println!("Scanning... enter a QR payload, or 'q' to quit.");
            }
            ScanStatus::AwaitingConfirmation => {
                println!("QR detected! Enter 'c' to confirm, 'q' to quit.");
            }
        }
    }
}

impl<R: BufRead> QrCapture for TerminalCapture<R> {
    fn next_frame(&mut self, status: ScanStatus) -> Result<Option<FrameScan>> {
        self.show_status(status);

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let line = line.trim();
        let frame = match line {
            "q" => FrameScan {
                detections: Vec::new(),
                key: Some(ScanKey::Quit),
            },
            "c" => FrameScan {
                detections: Vec::new(),
                key: Some(ScanKey::Confirm),
            },
            "" => FrameScan::default(),
            payload => FrameScan {
                detections: vec![Detection::new(payload)],
                key: None,
            },
        };
        Ok(Some(frame))
    }
}
