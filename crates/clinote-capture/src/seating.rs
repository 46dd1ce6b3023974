use clinote_core::model::{GroupSession, Member};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// A request to seat a member at a seat index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub seat_index: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub feature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeatOutcome {
    pub member: Member,
    /// The member who previously held the seat, if any.
    pub evicted: Option<Member>,
}

/// Seat a new member, replacing any prior occupant of the same seat index.
///
/// The name is required; a blank parent name is treated as absent.
pub fn assign_seat(
    session: &mut GroupSession,
    request: SeatAssignment,
) -> Result<SeatOutcome, CaptureError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(CaptureError::EmptyName);
    }

    let mut member = Member::new(name, request.seat_index).with_feature(request.feature.trim());
    if let Some(parent) = request
        .parent_name
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        member = member.with_parent(parent);
    }

    let evicted = session.seat_member(member.clone());
    if let Some(prior) = &evicted {
        tracing::debug!(
            "seat {} reassigned from {} to {}",
            request.seat_index,
            prior.name,
            member.name
        );
    }
    Ok(SeatOutcome { member, evicted })
}
