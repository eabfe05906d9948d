mod cli;

use bitlab::{BitError, NotFoundError};
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Not-found errors carry their own prefix and hint
            let preformatted = e.is::<NotFoundError>()
                || matches!(e.downcast_ref::<BitError>(), Some(BitError::NotFound(_)));
            if preformatted {
                eprintln!("{}", e);
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
