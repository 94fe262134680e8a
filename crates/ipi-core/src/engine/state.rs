use super::codec::StatusReply;

/// Energy, forces and virial of one frame, already converted to wire units and wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    /// Energy in hartree.
    pub energy: f64,
    /// Flat forces `[fx0, fy0, fz0, ...]` in hartree/bohr.
    pub forces: Vec<f64>,
    /// Row-major virial in hartree.
    pub virial: [f64; 9],
}

impl FrameResult {
    pub fn atom_count(&self) -> usize {
        self.forces.len() / 3
    }
}

/// Where the session stands between two messages.
///
/// A computed frame lives inside `HasData`, so at most one result can be pending
/// and delivering it necessarily leaves the `HasData` state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    Uninitialized,
    #[default]
    Ready,
    HasData(FrameResult),
}

impl ConnectionState {
    pub fn status(&self) -> StatusReply {
        match self {
            ConnectionState::Uninitialized => StatusReply::NeedInit,
            ConnectionState::Ready => StatusReply::Ready,
            ConnectionState::HasData(_) => StatusReply::HaveData,
        }
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, ConnectionState::Uninitialized)
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_computed: u64,
    pub forces_sent: u64,
    /// Atom count fixed by the first POSDATA, if one arrived.
    pub atom_count: Option<usize>,
}
