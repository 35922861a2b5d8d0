use anyhow::{anyhow, Context};
use gloo_utils::{document, head};
use js_sys::{Array, Function, Promise};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlLinkElement, HtmlScriptElement};

use super::modules::describe;

/// 4.21 is the first build whose `GeoJSONLayer` honours `orderBy`.
pub const ARCGIS_JS_URL: &str = "https://js.arcgis.com/4.21/";

const SCRIPT_MARKER: &str = "data-esri-loader";

#[wasm_bindgen(inline_js = r#"
export function amd_loader_ready() {
    return typeof window.require === "function" && typeof window.require.on === "function";
}

export function require_modules(names) {
    return new Promise((resolve, reject) => {
        const onError = window.require.on("error", (err) => {
            onError.remove();
            reject(err);
        });
        window.require(names, (...modules) => {
            onError.remove();
            resolve(modules);
        });
    });
}
"#)]
extern "C" {
    fn amd_loader_ready() -> bool;

    #[wasm_bindgen(catch)]
    fn require_modules(names: &Array) -> Result<Promise, JsValue>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    /// Base URL of the SDK build on the CDN, with a trailing slash.
    pub url: String,
    /// Also inject the SDK's theme stylesheet.
    pub css: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            url: ARCGIS_JS_URL.to_string(),
            css: true,
        }
    }
}

impl LoaderOptions {
    pub fn css_url(&self) -> String {
        format!("{}esri/themes/light/main.css", self.url)
    }
}

/// Resolves the named SDK modules, in the order given, injecting the SDK
/// script (and stylesheet) first if the page doesn't have them yet.
pub async fn load_modules(names: &[&str], options: &LoaderOptions) -> anyhow::Result<Vec<Function>> {
    if options.css {
        load_css(&options.css_url())?;
    }
    if !amd_loader_ready() {
        load_script(&options.url).await?;
    }

    let requested: Array = names.iter().map(|name| JsValue::from_str(name)).collect();
    let pending = require_modules(&requested)
        .map_err(|err| anyhow!("module loader unavailable: {}", describe(&err)))?;
    let resolved = JsFuture::from(pending)
        .await
        .map_err(|err| anyhow!("could not load modules {names:?}: {}", describe(&err)))?;
    let resolved: Array = resolved
        .dyn_into()
        .map_err(|_| anyhow!("module loader resolved something other than a list"))?;

    if resolved.length() as usize != names.len() {
        anyhow::bail!(
            "asked for {} modules, loader resolved {}",
            names.len(),
            resolved.length()
        );
    }
    let modules = resolved
        .iter()
        .zip(names)
        .map(|(module, name)| {
            module
                .dyn_into::<Function>()
                .map_err(|_| anyhow!("module {name} is not a constructor"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    log::info!("loaded {} SDK modules", modules.len());
    Ok(modules)
}

async fn load_script(url: &str) -> anyhow::Result<()> {
    let script = sdk_script(url)?;
    if script.get_attribute(SCRIPT_MARKER).as_deref() == Some("loaded") {
        anyhow::bail!("SDK script from {url} loaded but did not install an AMD loader");
    }

    let loaded = Promise::new(&mut |resolve, reject| {
        // Listeners, not `onload`, so concurrent loaders don't overwrite each other.
        let attached = script
            .add_event_listener_with_callback("load", &resolve)
            .and_then(|()| script.add_event_listener_with_callback("error", &reject));
        if let Err(err) = attached {
            let _ = reject.call1(&JsValue::UNDEFINED, &err);
        }
    });
    if let Err(err) = JsFuture::from(loaded).await {
        // A failed script never fires `load` again; drop it so the next mount injects afresh.
        script.remove();
        log::warn!("removed SDK script {url} after it failed to load");
        return Err(anyhow!("{}", describe(&err)))
            .with_context(|| format!("could not load the SDK script from {url}"));
    }
    script
        .set_attribute(SCRIPT_MARKER, "loaded")
        .map_err(|err| anyhow!("{}", describe(&err)))?;
    Ok(())
}

/// The page's SDK script element, injecting one for `url` if there is none yet.
fn sdk_script(url: &str) -> anyhow::Result<HtmlScriptElement> {
    let document = document();
    let selector = format!("script[{SCRIPT_MARKER}]");
    let existing = document
        .query_selector(&selector)
        .map_err(|err| anyhow!("{}", describe(&err)))?;
    if let Some(script) = existing {
        return script
            .dyn_into()
            .map_err(|_| anyhow!("{selector} is not a script element"));
    }

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(|err| anyhow!("{}", describe(&err)))?
        .dyn_into()
        .map_err(|_| anyhow!("created element is not a script"))?;
    script.set_src(url);
    script
        .set_attribute(SCRIPT_MARKER, "loading")
        .map_err(|err| anyhow!("{}", describe(&err)))?;
    head()
        .append_child(&script)
        .map_err(|err| anyhow!("{}", describe(&err)))?;
    log::info!("injected SDK script {url}");
    Ok(script)
}

fn load_css(url: &str) -> anyhow::Result<()> {
    let document = document();
    let selector = format!("link[href=\"{url}\"]");
    let present = document
        .query_selector(&selector)
        .map_err(|err| anyhow!("{}", describe(&err)))?
        .is_some();
    if present {
        return Ok(());
    }

    let link: HtmlLinkElement = document
        .create_element("link")
        .map_err(|err| anyhow!("{}", describe(&err)))?
        .dyn_into()
        .map_err(|_| anyhow!("created element is not a link"))?;
    link.set_rel("stylesheet");
    link.set_href(url);
    head()
        .append_child(&link)
        .map_err(|err| anyhow!("{}", describe(&err)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_stylesheet_lives_under_the_sdk_url() {
        let options = LoaderOptions {
            url: "https://cdn.example/4.18/".to_string(),
            css: true,
        };
        assert_eq!(
            options.css_url(),
            "https://cdn.example/4.18/esri/themes/light/main.css"
        );
    }

    #[test]
    fn default_sdk_build_supports_layer_ordering() {
        let version = ARCGIS_JS_URL
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap();
        let (major, minor) = version.split_once('.').unwrap();
        let version = (major.parse::<u32>().unwrap(), minor.parse::<u32>().unwrap());
        assert!(version >= (4, 21), "GeoJSONLayer.orderBy needs 4.21, got {version:?}");
        assert_eq!(
            LoaderOptions::default().css_url(),
            format!("{ARCGIS_JS_URL}esri/themes/light/main.css")
        );
    }

    #[test]
    fn defaults_to_the_arcgis_cdn() {
        let options = LoaderOptions::default();
        assert_eq!(options.url, ARCGIS_JS_URL);
        assert!(options.css);
    }
}
