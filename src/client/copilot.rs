use super::Client;
use crate::args::CopilotParams;
use crate::models::Copilot;
use crate::outcome::{ExecError, SoftPolicy};

impl Client {
    /// Run a one-shot copilot session and collect its messages.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn copilot(&self, params: &CopilotParams) -> Result<Copilot, ExecError> {
        self.invoke_many(params.build_args(), SoftPolicy::Decode)
            .await
            .map(Copilot)
    }
}
