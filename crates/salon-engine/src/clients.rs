//! Client directory for the admin dashboard.
//!
//! Lists the accounts with the `client` role. A profile without a phone number
//! borrows the one the client left on their reservations, so admins can reach
//! people who never completed their profile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reservation::Reservation;

/// Role carried by client accounts; staff accounts use other roles.
pub const CLIENT_ROLE: &str = "client";

/// A user account as stored in the users collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
}

impl Client {
    pub fn is_client(&self) -> bool {
        self.role == CLIENT_ROLE
    }

    fn sort_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDirectory {
    pub count: usize,
    pub clients: Vec<Client>,
}

/// Client accounts ordered by name, with missing phones filled in from
/// `reservations`.
///
/// Unnamed clients sort as an empty name, ahead of everyone else. When a
/// client booked several times, the phone on the latest reservation in
/// `reservations` order wins.
pub fn client_directory(users: &[Client], reservations: &[Reservation]) -> Vec<Client> {
    let mut phones: HashMap<&str, &str> = HashMap::new();
    for reservation in reservations {
        if let (Some(user_id), Some(phone)) = (&reservation.user_id, &reservation.phone) {
            if !user_id.is_empty() && !phone.trim().is_empty() {
                phones.insert(user_id, phone);
            }
        }
    }

    let mut clients: Vec<Client> = users
        .iter()
        .filter(|user| user.is_client())
        .map(|user| {
            let mut client = user.clone();
            if !client.has_phone() {
                if let Some(phone) = phones.get(client.id.as_str()) {
                    tracing::debug!(id = %client.id, "phone taken from reservations");
                    client.phone = Some((*phone).to_string());
                }
            }
            client
        })
        .collect();

    clients.sort_by(|a, b| a.sort_name().cmp(b.sort_name()));
    clients
}

/// Number of accounts with the `client` role.
pub fn client_count(users: &[Client]) -> usize {
    users.iter().filter(|user| user.is_client()).count()
}

pub fn directory_report(users: &[Client], reservations: &[Reservation]) -> ClientDirectory {
    let clients = client_directory(users, reservations);
    ClientDirectory {
        count: clients.len(),
        clients,
    }
}

/// Parse the users collection from its JSON array form.
pub fn clients_from_json(json: &str) -> Result<Vec<Client>> {
    Ok(serde_json::from_str(json)?)
}
