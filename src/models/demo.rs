use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::models::{
    identity::Identity,
    session::{Session, SessionClaims},
};

/// The key under which the demo flag is persisted.
pub const DEMO_FLAG_KEY: &str = "demo-mode";

const DEMO_USER_ID: Uuid = Uuid::from_u128(0x5f1c_2a9e_0d4b_4c3a_9e21_7b6d_8a40_c0de);

static DEMO_IDENTITY: Lazy<Identity> = Lazy::new(|| {
    let created_at: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or_default();

    Identity {
        id: DEMO_USER_ID,
        email: "demo@medmentor.app".to_string(),
        name: "Dr. Ana Ribeiro".to_string(),
        phone: Some("+55 11 98765-4321".to_string()),
        registration_number: Some("CRM-SP 123456".to_string()),
        specialty: Some("Cardiology".to_string()),
        created_at,
        updated_at: created_at,
    }
});

/// Returns the fixed demo identity.
pub fn demo_identity() -> Identity {
    DEMO_IDENTITY.clone()
}

/// Returns the instant `duration_days` from now, saturating at the largest
/// representable timestamp.
fn expiry_after(duration_days: i64) -> DateTime<Utc> {
    chrono::Duration::try_days(duration_days)
        .and_then(|duration| Utc::now().checked_add_signed(duration))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Builds the demo session for `identity`, valid for `duration_days`.
pub fn demo_session(identity: &Identity, duration_days: i64) -> Session {
    Session {
        access_token: "demo-access-token".to_string(),
        refresh_token: "demo-refresh-token".to_string(),
        expires_at: expiry_after(duration_days),
        token_type: "bearer".to_string(),
        claims: SessionClaims::from(identity),
    }
}
