//! Saving downloaded bytes to the user's machine.
//!
//! Native builds show a save dialog; WASM builds synthesize an anchor
//! element over a blob URL and click it.

/// Writes bytes out under the suggested file name.
///
/// Returns Ok(false) when the user cancels the dialog (native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn save_bytes(file_name: &str, bytes: &[u8]) -> Result<bool, String> {
    pollster::block_on(async {
        let Some(handle) = rfd::AsyncFileDialog::new()
            .set_file_name(file_name)
            .save_file()
            .await
        else {
            return Ok(false);
        };

        handle
            .write(bytes)
            .await
            .map_err(|e| format!("Failed to write file: {}", e))?;
        Ok(true)
    })
}

#[cfg(target_arch = "wasm32")]
pub fn save_bytes(file_name: &str, bytes: &[u8]) -> Result<bool, String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let result = trigger_anchor_download(&url, Some(file_name));
    let _ = web_sys::Url::revoke_object_url(&url);
    result?;
    Ok(true)
}

/// Points the browser at a URL directly (used for direct file links, where
/// no fetch happens on our side).
#[cfg(target_arch = "wasm32")]
pub fn open_url(url: &str) -> Result<(), String> {
    trigger_anchor_download(url, None)
}

#[cfg(target_arch = "wasm32")]
fn trigger_anchor_download(href: &str, download_name: Option<&str>) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Element was not an anchor".to_string())?;

    anchor.set_href(href);
    if let Some(name) = download_name {
        anchor.set_download(name);
    } else {
        anchor.set_target("_blank");
    }
    anchor.click();
    Ok(())
}
