// embedded page assets

use std::borrow::Cow;

use rust_embed::RustEmbed;
use tracing::warn;

#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.css"]
#[include = "*.html"]
struct PageAssets;

const FALLBACK_404: &str = "<!DOCTYPE html><html><body>\
<h1>404 - File or Directory Not Found.</h1></body></html>";

/// stylesheet inlined into every listing page
pub fn stylesheet() -> String {
    match PageAssets::get("listing.css") {
        Some(asset) => String::from_utf8_lossy(&asset.data).into_owned(),
        None => {
            warn!("embedded listing.css missing");
            String::new()
        }
    }
}

/// body of the generated 404 page
pub fn not_found_page() -> Cow<'static, [u8]> {
    match PageAssets::get("404.html") {
        Some(asset) => asset.data,
        None => {
            warn!("embedded 404.html missing, using fallback");
            Cow::Borrowed(FALLBACK_404.as_bytes())
        }
    }
}
