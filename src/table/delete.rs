//! Delete Flow
//!
//! Two-step deletion: a row is first put up for confirmation, then removed
//! once the confirmed request succeeds.

use crate::error::{Error, Result};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState<Id> {
    Idle,
    /// Waiting for the user to confirm deleting this row
    ConfirmPending(Id),
    /// Delete request in flight
    Deleting(Id),
}

#[derive(Debug)]
pub struct DeleteFlow<Id> {
    state: DeleteState<Id>,
}

impl<Id: Clone + Display> DeleteFlow<Id> {
    pub fn new() -> Self {
        Self {
            state: DeleteState::Idle,
        }
    }

    pub fn state(&self) -> &DeleteState<Id> {
        &self.state
    }

    /// Row awaiting confirmation, if any
    pub fn pending(&self) -> Option<&Id> {
        match &self.state {
            DeleteState::ConfirmPending(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.state, DeleteState::Deleting(_))
    }

    /// Open (or re-target) the confirmation prompt
    pub fn request(&mut self, id: Id) -> Result<()> {
        if let DeleteState::Deleting(current) = &self.state {
            return Err(Error::OperationInProgress {
                operation: format!("delete {current}"),
            });
        }
        self.state = DeleteState::ConfirmPending(id);
        Ok(())
    }

    /// Close the prompt; returns whether one was open
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, DeleteState::ConfirmPending(_)) {
            self.state = DeleteState::Idle;
            true
        } else {
            false
        }
    }

    /// Move the pending row into the in-flight state
    pub fn confirm(&mut self) -> Result<Id> {
        match &self.state {
            DeleteState::ConfirmPending(id) => {
                let id = id.clone();
                self.state = DeleteState::Deleting(id.clone());
                Ok(id)
            }
            DeleteState::Deleting(id) => Err(Error::OperationInProgress {
                operation: format!("delete {id}"),
            }),
            DeleteState::Idle => Err(Error::Invalid {
                message: "No delete is awaiting confirmation".to_string(),
            }),
        }
    }

    /// Leave the in-flight state, returning the row that was being deleted
    pub fn finish(&mut self) -> Option<Id> {
        match std::mem::replace(&mut self.state, DeleteState::Idle) {
            DeleteState::Deleting(id) => Some(id),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Drop a pending prompt whose row disappeared
    pub(crate) fn forget_pending_unless(&mut self, still_present: impl Fn(&Id) -> bool) {
        if let DeleteState::ConfirmPending(id) = &self.state
            && !still_present(id)
        {
            self.state = DeleteState::Idle;
        }
    }
}

impl<Id: Clone + Display> Default for DeleteFlow<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_retargets_open_prompt() {
        let mut flow = DeleteFlow::new();
        flow.request(1).expect("request");
        flow.request(2).expect("retarget");
        assert_eq!(flow.pending(), Some(&2));
    }

    #[test]
    fn second_delete_is_rejected_while_in_flight() {
        let mut flow = DeleteFlow::new();
        flow.request(1).expect("request");
        assert_eq!(flow.confirm().expect("confirm"), 1);
        assert!(matches!(
            flow.request(2),
            Err(Error::OperationInProgress { .. })
        ));
        assert!(matches!(
            flow.confirm(),
            Err(Error::OperationInProgress { .. })
        ));
        assert_eq!(flow.finish(), Some(1));
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[test]
    fn confirm_without_prompt_is_invalid() {
        let mut flow: DeleteFlow<u32> = DeleteFlow::new();
        assert!(matches!(flow.confirm(), Err(Error::Invalid { .. })));
        assert!(!flow.cancel());
        assert_eq!(flow.finish(), None);
    }
}
