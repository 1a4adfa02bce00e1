// =============================================================================
// AUTH BRIDGE
// =============================================================================
//
// Access tokens are minted from credentials owned by the external `gog` CLI:
//
// 1. `gog auth status --json` names the active account and its OAuth client file
// 2. `gog auth tokens export` writes the refresh token to a scoped temp file
// 3. the refresh token is exchanged at the OAuth token endpoint
//
// Token refresh internals stay with `gog`; this module only reads its output.

pub mod gog_auth;

pub use gog_auth::{AuthCli, GogAuth, GogCli, DEFAULT_OAUTH_TOKEN_URL};
