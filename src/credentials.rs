//! OS-keychain storage of named login profiles for the CLI.
//!
//! The report client itself never persists credentials; this only
//! saves a caller from retyping them on every pull.

use keyring::Entry;

use crate::types::Credentials;

const SERVICE_NAME: &str = "hedex-reports";

fn get_login_entry(profile_name: &str) -> Result<Entry, String> {
    let key = format!("login:{}", profile_name);
    Entry::new(SERVICE_NAME, &key)
        .map_err(|e| format!("Failed to create keyring entry: {}", e))
}

pub fn save_login_credentials(profile_name: &str, credentials: &Credentials) -> Result<(), String> {
    let entry = get_login_entry(profile_name)?;

    let credentials_json = serde_json::to_string(credentials)
        .map_err(|e| format!("Failed to serialize login credentials: {}", e))?;

    entry.set_password(&credentials_json)
        .map_err(|e| format!("Failed to save login credentials to keyring: {}", e))?;

    Ok(())
}

pub fn load_login_credentials(profile_name: &str) -> Result<Credentials, String> {
    let entry = get_login_entry(profile_name)?;

    let credentials_json = entry.get_password()
        .map_err(|e| format!("Failed to load login credentials from keyring: {}", e))?;

    let credentials: Credentials = serde_json::from_str(&credentials_json)
        .map_err(|e| format!("Failed to deserialize login credentials: {}", e))?;

    Ok(credentials)
}

pub fn delete_login_credentials(profile_name: &str) -> Result<(), String> {
    let entry = get_login_entry(profile_name)?;

    entry.delete_credential()
        .map_err(|e| format!("Failed to delete login credentials from keyring: {}", e))?;

    Ok(())
}
