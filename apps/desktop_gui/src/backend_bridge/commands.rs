//! Backend commands queued from UI to backend worker.

use client_core::{GenerationTicket, RemixTicket};

#[derive(Debug)]
pub enum BackendCommand {
    GenerateModule { ticket: GenerationTicket },
    RemixFragment { ticket: RemixTicket },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateModule { .. } => "generate_module",
            Self::RemixFragment { .. } => "remix_fragment",
        }
    }
}
