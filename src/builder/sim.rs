//! Builder for assembling simulators.

use crate::builder::error::{BuildError, RegistrationError};
use crate::core::Machine;
use crate::dispatch::{Bound, DynMachine};
use crate::sim::{IdAllocator, MachineId, MachineSlot, SimConfig, Simulator};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Builder for a [`Simulator`] over a fixed list of machines.
///
/// Machines are moved into the simulator's arena and addressed through the
/// returned [`MachineId`]s. No machine can be added once the simulator exists.
pub struct SimBuilder {
    config: SimConfig,
    slots: Vec<MachineSlot>,
    checks: Vec<Validation<(), NonEmptyVec<RegistrationError>>>,
}

impl SimBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            slots: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Set the simulator configuration.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a machine. Its dispatch table is built and checked here;
    /// problems are reported by [`build`](SimBuilder::build).
    pub fn add<M: Machine>(&mut self, machine: M) -> MachineId<M> {
        let slot = self.slots.len();
        let label = format!("{}#{}", short_type_name::<M>(), slot);
        let bound = Bound::new(machine);

        self.checks.push(bound.transitions().validate(&label));
        let state = if bound.is_uninitialized() {
            Validation::success(())
        } else {
            Validation::fail(RegistrationError::NotUninitialized {
                machine: label.clone(),
                state: bound.state_name(),
            })
        };
        self.checks.push(state);

        debug!(machine = %label, transitions = bound.transitions().len(), "registered");
        self.slots.push(MachineSlot {
            label,
            machine: Box::new(bound),
            ids: IdAllocator::default(),
        });
        MachineId::new(slot)
    }

    /// Validate every registered machine, deliver each its `Init` event and
    /// return the initialized simulator.
    pub fn build(self) -> Result<Simulator, BuildError> {
        if self.slots.is_empty() {
            return Err(BuildError::NoMachines);
        }

        if let Validation::Failure(errors) = Validation::all_vec(self.checks) {
            return Err(BuildError::InvalidMachines(errors.iter().cloned().collect()));
        }

        let mut sim = Simulator::new(self.slots, self.config);
        sim.initialize()?;
        Ok(sim)
    }
}

impl Default for SimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `crate::path::Type<Args>` -> `Type<Args>`
fn short_type_name<M>() -> &'static str {
    let full = std::any::type_name::<M>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}
