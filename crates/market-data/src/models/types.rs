use std::borrow::Cow;

/// Provider identifier - mostly static constants ("dexscreener", "jupiter", ...)
pub type ProviderId = Cow<'static, str>;

/// Asset identity shared by every provider (the on-chain mint address).
pub type AssetAddress = String;
