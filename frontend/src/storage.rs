use shared::gate::{format_mark, read_mark};
use shared::{MemoryMark, VoteMark};
use time::OffsetDateTime;
use web_sys::{window, Storage};

const LAST_VOTE_KEY: &str = "lastVoteTime";
const ADMIN_TOKEN_KEY: &str = "adminToken";

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn session_storage() -> Option<Storage> {
    window()?.session_storage().ok().flatten()
}

/// Vote mark kept in `localStorage` so the cooldown survives reloads.
/// When the browser refuses storage the mark only lives as long as the page.
#[derive(Debug, Default)]
pub struct LocalStorageMark {
    fallback: MemoryMark,
}

impl VoteMark for LocalStorageMark {
    fn read(&self) -> Option<OffsetDateTime> {
        let stored = local_storage().and_then(|storage| storage.get_item(LAST_VOTE_KEY).ok().flatten());
        read_mark(stored.as_deref()).or_else(|| self.fallback.read())
    }

    fn write(&mut self, at: OffsetDateTime) {
        self.fallback.write(at);
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(LAST_VOTE_KEY, &format_mark(at));
        }
    }
}

pub fn admin_token() -> Option<String> {
    session_storage()?.get_item(ADMIN_TOKEN_KEY).ok().flatten()
}

pub fn store_admin_token(token: &str) {
    if let Some(storage) = session_storage() {
        let _ = storage.set_item(ADMIN_TOKEN_KEY, token);
    }
}

pub fn clear_admin_token() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(ADMIN_TOKEN_KEY);
    }
}
