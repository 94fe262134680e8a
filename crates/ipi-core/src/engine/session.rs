use super::codec::{self, Command, CommandToken};
use super::config::EngineOptions;
use super::error::{EngineError, FramingError, ProtocolViolation};
use super::progress::{Progress, ProgressReporter};
use super::state::{ConnectionState, FrameResult, SessionSummary};
use crate::core::models::cell::SimulationCell;
use crate::core::ordering::AtomOrderMapper;
use crate::core::potential::{ComputeOracle, OracleError};
use crate::core::units;
use crate::core::utils::geometry::{flatten, unflatten, wrap_into_cell};
use std::io::{Read, Write};
use tracing::{debug, info, trace, warn};

/// The client side of one i-PI connection.
///
/// The engine owns the channel, the evaluator, the atom mapping and the single
/// cached frame. It processes one message at a time and never reads the next
/// header before the previous response has been written.
pub struct ProtocolEngine<'a, C, O> {
    channel: C,
    oracle: O,
    mapper: AtomOrderMapper,
    state: ConnectionState,
    atom_count: Option<usize>,
    summary: SessionSummary,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a, C, O> ProtocolEngine<'a, C, O>
where
    C: Read + Write,
    O: ComputeOracle,
{
    pub fn new(channel: C, oracle: O, mapper: AtomOrderMapper, options: EngineOptions) -> Self {
        let state = if options.require_init {
            ConnectionState::Uninitialized
        } else {
            ConnectionState::Ready
        };
        Self {
            channel,
            oracle,
            mapper,
            state,
            atom_count: None,
            summary: SessionSummary::default(),
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// The atom count fixed by the first POSDATA, if any has arrived.
    pub fn atom_count(&self) -> Option<usize> {
        self.atom_count
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            atom_count: self.atom_count,
            ..self.summary
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Processes messages until the peer closes the connection.
    ///
    /// A close at a message boundary ends the session normally. Every other
    /// failure is fatal for the connection and is returned as is.
    pub fn run(&mut self) -> Result<SessionSummary, EngineError> {
        while self.step()?.is_some() {}
        let summary = self.summary();
        info!(
            "Peer closed the connection after {} frame(s).",
            summary.frames_computed
        );
        Ok(summary)
    }

    /// Processes exactly one message.
    ///
    /// Returns the command handled, or `None` if the peer closed the connection
    /// before sending another header.
    pub fn step(&mut self) -> Result<Option<Command>, EngineError> {
        let token = match codec::read_header(&mut self.channel) {
            Ok(token) => token,
            Err(FramingError::ChannelClosed) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("Received header {}", token);
        self.dispatch(&token).map(Some)
    }

    fn dispatch(&mut self, token: &CommandToken) -> Result<Command, EngineError> {
        let command = token
            .command()
            .ok_or_else(|| ProtocolViolation::UnexpectedHeader(token.to_string()))?;
        match command {
            Command::Status => self.handle_status()?,
            Command::Init => self.handle_init()?,
            Command::PosData => self.handle_posdata()?,
            Command::GetForce => self.handle_getforce()?,
        }
        Ok(command)
    }

    fn handle_status(&mut self) -> Result<(), EngineError> {
        let reply = self.state.status();
        codec::write_status(&mut self.channel, reply)?;
        debug!("Sent status {:?}", reply);
        Ok(())
    }

    fn handle_init(&mut self) -> Result<(), EngineError> {
        let payload = codec::read_init_payload(&mut self.channel)?;
        debug!("Received INIT with {} byte(s)", payload.len());
        if !payload.is_empty() {
            let text = String::from_utf8_lossy(&payload);
            warn!("Ignoring INIT payload: {}", text);
            self.report(Progress::Message(format!("INIT payload ignored: {}", text)));
        }
        if !self.state.is_initialized() {
            self.state = ConnectionState::Ready;
        }
        Ok(())
    }

    fn handle_posdata(&mut self) -> Result<(), EngineError> {
        if !self.state.is_initialized() {
            return Err(ProtocolViolation::NotInitialized { command: "POSDATA" }.into());
        }

        // The coordinate file fixes the count before the first frame, so even the
        // first POSDATA is checked before any position is read.
        let expected = self.atom_count.unwrap_or(self.mapper.num_atoms());
        let first_frame = self.atom_count.is_none();
        let payload = codec::read_posdata_payload(&mut self.channel, Some(expected)).map_err(
            |e| match e {
                EngineError::Protocol(ProtocolViolation::AtomCountChanged { expected, received })
                    if first_frame =>
                {
                    EngineError::from(ProtocolViolation::AtomCountMismatch {
                        configured: expected,
                        received,
                    })
                }
                other => other,
            },
        )?;
        let num_atoms = payload.atom_count;
        if first_frame {
            info!("Number of atoms in system: {}", num_atoms);
            self.atom_count = Some(num_atoms);
        }

        let cell = SimulationCell::from_wire(&payload.cell, &payload.inverse);
        let mut coords = payload.positions;
        units::lengths_to_backend(&mut coords);
        let mut positions = unflatten(&self.mapper.forward(&coords, 3)?);
        wrap_into_cell(&cell, &mut positions);

        let evaluation = self
            .oracle
            .compute(self.mapper.get_types(), &positions, &cell)?;
        if evaluation.forces.len() != num_atoms {
            return Err(OracleError::ShapeMismatch {
                expected: num_atoms,
                actual: evaluation.forces.len(),
            }
            .into());
        }

        let mut forces = self.mapper.backward(&flatten(&evaluation.forces), 3)?;
        units::forces_to_wire(&mut forces);
        let mut virial = [0.0; 9];
        for (i, v) in virial.iter_mut().enumerate() {
            *v = evaluation.virial[(i / 3, i % 3)];
        }
        units::virial_components_to_wire(&mut virial);

        self.summary.frames_computed += 1;
        let frame = self.summary.frames_computed;
        let energy = units::energy_to_wire(evaluation.energy);
        info!("Energy of frame {}: {:.10e} eV", frame, evaluation.energy);
        trace!(?virial, "Virial in wire units");
        self.report(Progress::FrameComputed { frame, energy });

        self.state = ConnectionState::HasData(FrameResult {
            energy,
            forces,
            virial,
        });
        Ok(())
    }

    fn handle_getforce(&mut self) -> Result<(), EngineError> {
        let result = match std::mem::take(&mut self.state) {
            ConnectionState::HasData(result) => result,
            ConnectionState::Uninitialized => {
                self.state = ConnectionState::Uninitialized;
                return Err(ProtocolViolation::NotInitialized {
                    command: "GETFORCE",
                }
                .into());
            }
            ConnectionState::Ready => return Err(ProtocolViolation::NoPendingResult.into()),
        };

        codec::write_getforce_response(
            &mut self.channel,
            result.energy,
            &result.forces,
            &result.virial,
        )?;
        self.summary.forces_sent += 1;
        debug!("Sent FORCEREADY for {} atom(s)", result.atom_count());
        self.report(Progress::ForcesSent {
            frame: self.summary.frames_computed,
        });
        Ok(())
    }

    fn report(&self, event: Progress) {
        if let Some(reporter) = self.reporter {
            reporter.report(event);
        }
    }
}
