//! Database operations for the `donation_requests` table.

mod read;
mod types;
mod write;

pub use read::{get_donation_request, list_donation_requests, list_pending_resolution};
pub use types::{DonationRequestChanges, DonationRequestRow, NewDonationRequest};
pub use write::{
    delete_donation_request, insert_donation_request, mark_sent_to_admin,
    update_donation_request, update_location,
};

/// Column list shared by every query that returns a [`DonationRequestRow`].
const COLUMNS: &str = "id, name, blood_group, hospital, contact, posted_by, active, \
                       sent_to_admin, sent_to_admin_at, geo_latitude, geo_longitude, \
                       location_text, location_raw, created_at, updated_at";
