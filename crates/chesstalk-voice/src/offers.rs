//! Draw offers and resignation confirmations across turns.
//!
//! At most one offer is pending. A pending offer survives ordinary board moves;
//! only an explicit accept/reject/confirm/cancel clears it.

use chesstalk_core::{Color, CommandError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OfferState {
    #[default]
    Idle,
    DrawPending { offered_by: Color },
    ResignPending { resigning: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEvent {
    OfferDraw(Color),
    AcceptDraw,
    RejectDraw,
    Resign(Color),
    ConfirmResign,
    CancelResign,
}

/// What happened, for the dispatcher to turn into status and announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferTransition {
    DrawOffered { by: Color },
    /// Repeated offer while one is already pending: re-announce, nothing new.
    DrawReannounced { by: Color },
    ResignRequested { by: Color },
    ResignReannounced { by: Color },
    /// A request of the other kind while an offer is pending; the pending one stands.
    OtherOfferPending(OfferState),
    DrawAccepted { offered_by: Color },
    DrawRejected { offered_by: Color },
    Resigned { by: Color },
    ResignCancelled { by: Color },
}

#[derive(Debug, Clone, Default)]
pub struct OfferStateMachine {
    state: OfferState,
}

impl OfferStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OfferState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state != OfferState::Idle
    }

    /// Compute the next state without committing it.
    pub fn next(&self, event: OfferEvent) -> Result<(OfferState, OfferTransition), CommandError> {
        use OfferEvent as E;
        use OfferState as S;

        let stay = |t: OfferTransition| -> Result<(OfferState, OfferTransition), CommandError> {
            Ok((self.state, t))
        };
        match (self.state, event) {
            (S::Idle, E::OfferDraw(by)) => Ok((
                S::DrawPending { offered_by: by },
                OfferTransition::DrawOffered { by },
            )),
            (S::DrawPending { offered_by }, E::OfferDraw(_)) => {
                stay(OfferTransition::DrawReannounced { by: offered_by })
            }
            (S::ResignPending { .. }, E::OfferDraw(_)) => {
                stay(OfferTransition::OtherOfferPending(self.state))
            }

            (S::Idle, E::Resign(by)) => Ok((
                S::ResignPending { resigning: by },
                OfferTransition::ResignRequested { by },
            )),
            (S::ResignPending { resigning }, E::Resign(_)) => {
                stay(OfferTransition::ResignReannounced { by: resigning })
            }
            (S::DrawPending { .. }, E::Resign(_)) => {
                stay(OfferTransition::OtherOfferPending(self.state))
            }

            (S::DrawPending { offered_by }, E::AcceptDraw) => {
                Ok((S::Idle, OfferTransition::DrawAccepted { offered_by }))
            }
            (S::DrawPending { offered_by }, E::RejectDraw) => {
                Ok((S::Idle, OfferTransition::DrawRejected { offered_by }))
            }
            (S::ResignPending { resigning }, E::ConfirmResign) => {
                Ok((S::Idle, OfferTransition::Resigned { by: resigning }))
            }
            (S::ResignPending { resigning }, E::CancelResign) => {
                Ok((S::Idle, OfferTransition::ResignCancelled { by: resigning }))
            }

            (_, E::AcceptDraw | E::RejectDraw | E::ConfirmResign | E::CancelResign) => {
                Err(CommandError::NoPendingOffer)
            }
        }
    }

    /// Commit the transition for `event`. State is unchanged on error.
    pub fn apply(&mut self, event: OfferEvent) -> Result<OfferTransition, CommandError> {
        let (next, transition) = self.next(event)?;
        if next != self.state {
            tracing::info!("Offer state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        Ok(transition)
    }

    pub fn reset(&mut self) {
        self.state = OfferState::Idle;
    }
}
