use serde::Serialize;

/// Independent streams of map updates. Ordering only matters within a channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Style,
    Selection,
    Layers,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Style => 0,
            Channel::Selection => 1,
            Channel::Layers => 2,
        }
    }
}

/// Identifies one planned batch. Sequence numbers increase per channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket {
    pub channel: Channel,
    pub seq: u64,
}

/// Last-write-wins gate: only the most recently issued ticket of a channel
/// is current.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: [u64; 3],
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, channel: Channel) -> Ticket {
        let slot = &mut self.latest[channel.index()];
        *slot += 1;
        Ticket {
            channel,
            seq: *slot,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest[ticket.channel.index()] == ticket.seq
    }
}
