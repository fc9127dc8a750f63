// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The linear state machine driving a [`Signature`](super::Signature).

use std::fmt;

use crate::error::{PackagerError, Result};

/// The progress of a signature build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// File references are being accumulated.
    #[default]
    Collecting,
    /// The manifest has been digested into the signed info.
    Digested,
    /// The signed info has been signed.
    Signed,
    /// The signature value has been timestamped.
    Timestamped,
}

/// An operation on a [`Signature`](super::Signature) which is subject to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddFile,
    Digest,
    Sign,
    Timestamp,
    Encode,
}

impl State {
    /// Returns whether the operation may run in this state.
    pub fn permits(self, operation: Operation) -> bool {
        matches!(
            (self, operation),
            (State::Collecting, Operation::AddFile)
                | (State::Collecting, Operation::Digest)
                | (State::Digested, Operation::Sign)
                | (State::Signed, Operation::Timestamp)
                | (State::Signed, Operation::Encode)
                | (State::Timestamped, Operation::Encode)
        )
    }

    /// Returns the state reached once the operation completes.
    ///
    /// Operations which aren't permitted leave the state untouched.
    pub fn after(self, operation: Operation) -> State {
        if !self.permits(operation) {
            return self;
        }

        match operation {
            Operation::AddFile | Operation::Encode => self,
            Operation::Digest => State::Digested,
            Operation::Sign => State::Signed,
            Operation::Timestamp => State::Timestamped,
        }
    }

    pub(crate) fn check(self, operation: Operation) -> Result<()> {
        if self.permits(operation) {
            Ok(())
        } else {
            Err(PackagerError::SignatureOrder { operation, state: self })
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Collecting => "collecting files",
            State::Digested => "digested",
            State::Signed => "signed",
            State::Timestamped => "timestamped",
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::AddFile => "add_file",
            Operation::Digest => "digest",
            Operation::Sign => "sign",
            Operation::Timestamp => "timestamp",
            Operation::Encode => "encode",
        })
    }
}
