/// Stamp identifying one load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    issued: u64,
}

impl LoadSequencer {
    pub fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn latest(&self) -> Option<LoadTicket> {
        (self.issued > 0).then_some(LoadTicket(self.issued))
    }
}
