//! Ownership verification of lowered functions.
//!
//! A single left-to-right pass over the instruction trace, keeping one abstract
//! state per local. There are no branches or loops in the IR, so no join points
//! need merging: the state after an instruction depends only on the state before it.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use super::errors::{OwnershipError, UseKind};
use crate::ir::{FnBody, Instruction, InstructionKind, InternalError, ProgramBody, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarState {
    Uninitialized,
    Alive,
    Moved,
}

#[derive(Debug, Clone)]
struct VarInfo {
    state: VarState,
    /// How many times the value was consumed, by move or return.
    moves: usize,
    moved_at: Option<Span>,
    dropped_at: Option<Span>,
}

impl VarInfo {
    fn new() -> Self {
        Self {
            state: VarState::Uninitialized,
            moves: 0,
            moved_at: None,
            dropped_at: None,
        }
    }
}

/// Checks every function independently, returning the first violation of each
/// rejected function.
pub fn check_program(ir: &ProgramBody) -> Vec<OwnershipError> {
    ir.functions
        .iter()
        .filter_map(|body| check_function(body).err())
        .collect()
}

/// Proves that every local of `body` is read only while alive and consumed at most once.
#[instrument(level = "debug", skip_all, fields(name = %body.name))]
pub fn check_function(body: &FnBody) -> Result<(), OwnershipError> {
    let mut checker = OwnershipChecker::new(body);

    for instruction in &body.instructions {
        checker.step(instruction)?;
    }

    debug!("ownership ok");
    Ok(())
}

/// The abstract interpreter state for one function.
#[derive(Debug, Clone)]
pub struct OwnershipChecker<'b> {
    body: &'b FnBody,
    vars: HashMap<String, VarInfo>,
}

impl<'b> OwnershipChecker<'b> {
    /// Starts with every local of the function uninitialized.
    pub fn new(body: &'b FnBody) -> Self {
        Self {
            body,
            vars: body
                .local_names()
                .map(|name| (name.to_string(), VarInfo::new()))
                .collect(),
        }
    }

    pub fn state(&self, name: &str) -> Option<VarState> {
        self.vars.get(name).map(|info| info.state)
    }

    /// Applies the transition rule of one instruction.
    pub fn step(&mut self, instruction: &Instruction) -> Result<(), OwnershipError> {
        trace!("check `{}`", instruction);

        match &instruction.kind {
            InstructionKind::OwnLiteral { target, .. } => {
                self.set_alive(target, instruction)?;
            }
            InstructionKind::MoveVar { target, source, .. } => {
                let Some(info) = self.vars.get(source) else {
                    return Err(OwnershipError::MoveOfUnknown {
                        function: self.body.name.clone(),
                        name: source.clone(),
                        instruction: instruction.clone(),
                    });
                };

                match info.state {
                    VarState::Uninitialized => {
                        return Err(OwnershipError::MoveOfUninitialized {
                            function: self.body.name.clone(),
                            name: source.clone(),
                            dropped_at: info.dropped_at,
                            instruction: instruction.clone(),
                        });
                    }
                    VarState::Moved => {
                        return Err(OwnershipError::DoubleMove {
                            function: self.body.name.clone(),
                            name: source.clone(),
                            prior_moves: info.moves,
                            moved_at: info.moved_at,
                            instruction: instruction.clone(),
                        });
                    }
                    VarState::Alive => {}
                }

                self.lookup(target, instruction)?;
                self.consume(source, instruction.span);
                self.set_alive(target, instruction)?;
            }
            InstructionKind::Assign { target, operand } => {
                if let Some(name) = operand.get_local() {
                    self.check_use(name, UseKind::Read, instruction)?;
                }
                self.set_alive(target, instruction)?;
            }
            InstructionKind::Return(operand) => {
                if let Some(name) = operand.get_local() {
                    self.check_use(name, UseKind::Return, instruction)?;
                    // A returned value is consumed, nothing may drop or read it afterwards.
                    self.consume(name, instruction.span);
                }
            }
            InstructionKind::Drop(target) => {
                let info = self.lookup(target, instruction)?;
                if info.state == VarState::Alive {
                    info.state = VarState::Uninitialized;
                    info.dropped_at = instruction.span;
                }
            }
            InstructionKind::BlockStart | InstructionKind::BlockEnd => {}
        }

        Ok(())
    }

    fn lookup(
        &mut self,
        name: &str,
        instruction: &Instruction,
    ) -> Result<&mut VarInfo, OwnershipError> {
        self.vars.get_mut(name).ok_or_else(|| {
            InternalError::UnregisteredLocal {
                function: self.body.name.clone(),
                name: name.to_string(),
                instruction: instruction.clone(),
            }
            .into()
        })
    }

    fn set_alive(&mut self, name: &str, instruction: &Instruction) -> Result<(), OwnershipError> {
        let info = self.lookup(name, instruction)?;
        info.state = VarState::Alive;
        info.dropped_at = None;
        Ok(())
    }

    fn consume(&mut self, name: &str, span: Option<Span>) {
        if let Some(info) = self.vars.get_mut(name) {
            info.state = VarState::Moved;
            info.moves += 1;
            info.moved_at = span;
        }
    }

    fn check_use(
        &self,
        name: &str,
        kind: UseKind,
        instruction: &Instruction,
    ) -> Result<(), OwnershipError> {
        let function = self.body.name.clone();
        let Some(info) = self.vars.get(name) else {
            return Err(OwnershipError::UseOfUnknown {
                function,
                name: name.to_string(),
                kind,
                instruction: instruction.clone(),
            });
        };

        match info.state {
            VarState::Alive => Ok(()),
            VarState::Moved => Err(OwnershipError::UseAfterMove {
                function,
                name: name.to_string(),
                kind,
                moved_at: info.moved_at,
                instruction: instruction.clone(),
            }),
            VarState::Uninitialized => Err(OwnershipError::UseOfUninitialized {
                function,
                name: name.to_string(),
                kind,
                dropped_at: info.dropped_at,
                instruction: instruction.clone(),
            }),
        }
    }
}
