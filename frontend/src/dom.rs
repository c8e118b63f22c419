use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlDocument, HtmlElement, Storage, Window};

use crate::api::HttpBlogApi;
use crate::config::ClientConfig;
use crate::error::MountError;
use crate::post::Id;
use crate::render::{post_view_markup, DELETE_ACTION, LIKE_ACTION};
use crate::routes::{parse_id, post_id_from_path};
use crate::storage::LocalStore;
use crate::view::{ConfirmDialog, PostController, PostView, Shell};

thread_local! {
    static CONTROLLER: RefCell<Option<PostController>> = RefCell::new(None);
}

fn js_err(err: JsValue) -> MountError {
    MountError::Js(format!("{:?}", err))
}

pub fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::MissingGlobal("window"))
}

pub fn get_local_storage() -> Result<Storage, MountError> {
    window()?
        .local_storage()
        .map_err(js_err)?
        .ok_or(MountError::MissingGlobal("localStorage"))
}

pub fn document_and_root(selector: &str) -> Result<(Document, Element), MountError> {
    let document = window()?
        .document()
        .ok_or(MountError::MissingGlobal("document"))?;
    let root = document
        .query_selector(selector)
        .map_err(js_err)?
        .ok_or_else(|| MountError::MissingRoot(selector.to_owned()))?;

    Ok((document, root))
}

/// Viewer id left in local storage by the sign-in flow.
pub fn stored_viewer(storage: &Storage, key: &str) -> Option<Id> {
    storage
        .get_item(key)
        .ok()
        .flatten()
        .and_then(|raw| parse_id(&raw))
}

pub struct BrowserShell {
    window: Window,
}

impl BrowserShell {
    pub fn new(window: Window) -> Self {
        BrowserShell { window }
    }
}

impl Shell for BrowserShell {
    fn confirm(&self, dialog: &ConfirmDialog) -> bool {
        let message = format!(
            "{}\n{}\n\nOK: {}",
            dialog.title, dialog.text, dialog.confirm_label
        );
        self.window
            .confirm_with_message(&message)
            .unwrap_or(false)
    }

    fn notify(&self, title: &str, text: &str) {
        if let Err(err) = self
            .window
            .alert_with_message(&format!("{}\n{}", title, text))
        {
            log::warn!("could not show notification: {:?}", err);
        }
    }

    fn navigate(&self, path: &str) {
        if let Err(err) = self.window.location().set_href(path) {
            log::error!("could not navigate to {}: {:?}", path, err);
        }
    }

    fn cookies(&self) -> String {
        self.window
            .document()
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .and_then(|document| document.cookie().ok())
            .unwrap_or_default()
    }
}

/// Wires a controller to `root`: re-renders on every state change and routes
/// clicks on `data-action` elements to the like and delete handlers.
pub fn mount(config: &ClientConfig) -> Result<PostController, MountError> {
    let window = window()?;
    let (_document, root) = document_and_root(&config.root_selector)?;
    let storage = get_local_storage()?;

    let controller = PostController::new(
        Rc::new(HttpBlogApi::new(config.clone())),
        Rc::new(LocalStore::new(storage)),
        Rc::new(BrowserShell::new(window)),
        &config.token_cookie,
    );

    let render_root = root.clone();
    controller.init_on_change(Box::new(move |view: &PostView| {
        render_root.set_inner_html(&post_view_markup(view, Utc::now()));
    }));

    let click_controller = controller.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let action = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|target| target.closest("[data-action]").ok().flatten())
            .and_then(|target| target.get_attribute("data-action"));

        let controller = click_controller.clone();
        match action.as_deref() {
            Some(LIKE_ACTION) => wasm_bindgen_futures::spawn_local(async move {
                controller.like().await;
            }),
            Some(DELETE_ACTION) => wasm_bindgen_futures::spawn_local(async move {
                // failures are logged by the controller
                let _ = controller.delete().await;
            }),
            _ => {}
        }
    });

    root.dyn_ref::<HtmlElement>()
        .ok_or(MountError::MissingRoot(config.root_selector.clone()))?
        .set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();

    Ok(controller)
}

fn start(config: ClientConfig) -> Result<(), MountError> {
    let path = window()?.location().pathname().map_err(js_err)?;
    let post_id = post_id_from_path(&path).ok_or(MountError::NoPostId(path))?;
    let viewer = stored_viewer(&get_local_storage()?, &config.viewer_storage_key);

    let controller = mount(&config)?;
    log::info!("showing blog {} for viewer {:?}", post_id, viewer);

    let loader = controller.clone();
    wasm_bindgen_futures::spawn_local(async move {
        loader.load(post_id, viewer).await;
    });

    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
    Ok(())
}

#[wasm_bindgen]
pub fn bootstrap() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    crate::init_console_logger(log::LevelFilter::Info);

    if let Err(err) = start(ClientConfig::default()) {
        log::error!("could not start post page: {}", err);
    }
}

fn current_controller() -> Option<PostController> {
    CONTROLLER.with(|slot| slot.borrow().clone())
}

/// Switches the mounted page to another post, e.g. after client-side navigation.
#[wasm_bindgen]
pub fn show_post(id: &str) {
    let Some(id) = parse_id(id) else {
        log::error!("show_post: `{}` is not a post id", id);
        return;
    };
    let Some(controller) = current_controller() else {
        log::warn!("show_post called before bootstrap");
        return;
    };
    let viewer = controller.view().borrow().viewer();
    wasm_bindgen_futures::spawn_local(async move {
        controller.load(id, viewer).await;
    });
}

/// Called by the auth layer when the signed-in user changes; `None` signs out.
#[wasm_bindgen]
pub fn set_viewer(id: Option<String>) {
    let viewer = match id.as_deref().map(parse_id) {
        Some(None) => {
            log::error!("set_viewer: `{}` is not a user id", id.unwrap_or_default());
            return;
        }
        Some(Some(viewer)) => Some(viewer),
        None => None,
    };
    let Some(controller) = current_controller() else {
        log::warn!("set_viewer called before bootstrap");
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        controller.set_viewer(viewer).await;
    });
}
