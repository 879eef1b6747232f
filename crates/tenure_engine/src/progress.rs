use std::sync::mpsc;

use tenure_core::StopReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    Current,
    Past,
}

/// Progress notifications emitted while an analysis runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Started {
        company_id: String,
        target: usize,
    },
    Expanded {
        unique_cards: usize,
    },
    CrawlFinished {
        roster: Roster,
        cards: usize,
        pages: u32,
        stop_reason: StopReason,
    },
    RecordExtracted {
        roster: Roster,
        extracted: usize,
        attempted: usize,
    },
    Completed {
        records: usize,
    },
}

pub trait ProgressSink {
    fn emit(&self, event: AnalysisEvent);
}

pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: AnalysisEvent) {}
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<AnalysisEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<AnalysisEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: AnalysisEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}
