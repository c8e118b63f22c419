use std::cell::RefCell;
use std::rc::Rc;

use crate::api::BlogApi;
use crate::cookie::read_cookie;
use crate::error::ApiError;
use crate::post::{Id, LikeReceipt, Post};
use crate::routes::HOME_PATH;
use crate::storage::{load_liked, save_liked, KeyValueStore};

/// Tags each load so that only the latest request may update the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Loaded(Post),
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeStatus {
    Idle,
    Pending,
    Confirmed,
    Failed,
}

/// What a like click changed, kept so the change can be undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LikeTicket {
    pub generation: Generation,
    pub post_id: Id,
    pub previous_liked: bool,
    pub previous_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: &'static str,
    pub text: &'static str,
    pub confirm_label: &'static str,
}

pub const DELETE_DIALOG: ConfirmDialog = ConfirmDialog {
    title: "Are you sure?",
    text: "You won't be able to revert this!",
    confirm_label: "Yes, delete it!",
};

pub const DELETED_TITLE: &str = "Deleted!";
pub const DELETED_TEXT: &str = "Your blog has been deleted.";

/// State of the post page for one post id and one viewer.
#[derive(Clone, Debug)]
pub struct PostView {
    post_id: Option<Id>,
    viewer: Option<Id>,
    generation: Generation,
    state: ViewState,
    liked: bool,
    like_status: LikeStatus,
    /// Post whose like request is still outstanding; survives reloads.
    like_in_flight: Option<Id>,
}

impl Default for PostView {
    fn default() -> Self {
        PostView {
            post_id: None,
            viewer: None,
            generation: Generation::default(),
            state: ViewState::Loading,
            liked: false,
            like_status: LikeStatus::Idle,
            like_in_flight: None,
        }
    }
}

impl PostView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_id(&self) -> Option<Id> {
        self.post_id
    }

    pub fn viewer(&self) -> Option<Id> {
        self.viewer
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn post(&self) -> Option<&Post> {
        match &self.state {
            ViewState::Loaded(post) => Some(post),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == ViewState::Loading
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn like_status(&self) -> LikeStatus {
        self.like_status
    }

    pub fn is_owner(&self) -> bool {
        self.post()
            .map_or(false, |post| post.is_owned_by(self.viewer))
    }

    pub fn begin_load(&mut self, id: Id, viewer: Option<Id>) -> Generation {
        self.generation = self.generation.next();
        self.post_id = Some(id);
        self.viewer = viewer;
        self.state = ViewState::Loading;
        self.liked = false;
        self.like_status = if self.like_in_flight == Some(id) {
            LikeStatus::Pending
        } else {
            LikeStatus::Idle
        };
        self.generation
    }

    /// Applies a fetch result. Returns false when the result belongs to a superseded load.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<Post, ApiError>,
        store: &dyn KeyValueStore,
    ) -> bool {
        if generation != self.generation {
            log::debug!(
                "dropping stale response for load {:?}, current is {:?}",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(post) => {
                self.liked = match self.post_id {
                    Some(id) => load_liked(store, id),
                    None => false,
                };
                self.state = ViewState::Loaded(post);
            }
            Err(err) => {
                log::error!("failed to load blog {:?}: {}", self.post_id, err);
                self.state = ViewState::Failed(err.to_string());
            }
        }
        true
    }

    /// Optimistically flips the like flag. `None` if there is nothing to like or a
    /// like request is already outstanding.
    pub fn begin_like(&mut self, store: &dyn KeyValueStore) -> Option<LikeTicket> {
        let post_id = self.post_id?;
        if self.like_in_flight == Some(post_id) {
            log::debug!("like already in flight, ignoring click");
            return None;
        }
        let post = match &mut self.state {
            ViewState::Loaded(post) => post,
            _ => return None,
        };

        let ticket = LikeTicket {
            generation: self.generation,
            post_id,
            previous_liked: self.liked,
            previous_count: post.likes_count,
        };

        self.liked = !self.liked;
        post.likes_count = if self.liked {
            post.likes_count + 1
        } else {
            post.likes_count.saturating_sub(1)
        };
        self.like_status = LikeStatus::Pending;
        self.like_in_flight = Some(post_id);
        persist_liked(store, post_id, self.liked);

        Some(ticket)
    }

    /// Settles a like request. A failure is always undone in storage, even when the
    /// view has reloaded or moved to another post since the click.
    pub fn finish_like(
        &mut self,
        ticket: LikeTicket,
        result: Result<Option<LikeReceipt>, ApiError>,
        store: &dyn KeyValueStore,
    ) {
        if self.like_in_flight == Some(ticket.post_id) {
            self.like_in_flight = None;
        }

        if self.post_id != Some(ticket.post_id) {
            log::debug!("like for blog {} finished after the view moved on", ticket.post_id);
            if let Err(err) = result {
                log::error!("failed to toggle like on blog {}: {}", ticket.post_id, err);
                persist_liked(store, ticket.post_id, ticket.previous_liked);
            }
            return;
        }
        // after a reload the count on screen came from the server, not from this click
        let reloaded = ticket.generation != self.generation;

        match result {
            Ok(receipt) => {
                self.like_status = LikeStatus::Confirmed;
                let receipt = receipt.unwrap_or_default();
                if let (Some(count), ViewState::Loaded(post)) =
                    (receipt.likes_count, &mut self.state)
                {
                    post.likes_count = count;
                }
                if let Some(liked) = receipt.liked {
                    if liked != self.liked {
                        self.liked = liked;
                        persist_liked(store, ticket.post_id, liked);
                    }
                }
            }
            Err(err) => {
                log::error!("failed to toggle like on blog {}: {}", ticket.post_id, err);
                self.like_status = LikeStatus::Failed;
                self.liked = ticket.previous_liked;
                persist_liked(store, ticket.post_id, ticket.previous_liked);
                if let (false, ViewState::Loaded(post)) = (reloaded, &mut self.state) {
                    post.likes_count = ticket.previous_count;
                }
            }
        }
    }
}

fn persist_liked(store: &dyn KeyValueStore, id: Id, liked: bool) {
    if let Err(err) = save_liked(store, id, liked) {
        log::warn!("could not persist like flag for blog {}: {}", id, err);
    }
}

/// Browser capabilities the page needs besides HTTP and storage.
pub trait Shell {
    /// Blocks until the user answers.
    fn confirm(&self, dialog: &ConfirmDialog) -> bool;
    fn notify(&self, title: &str, text: &str);
    fn navigate(&self, path: &str);
    fn cookies(&self) -> String;
}

/// Drives a shared `PostView` through the backend calls.
///
/// The view is never borrowed across an `.await`, so a controller can be cloned
/// into event handlers and run several operations concurrently on one thread.
#[derive(Clone)]
pub struct PostController {
    view: Rc<RefCell<PostView>>,
    api: Rc<dyn BlogApi>,
    store: Rc<dyn KeyValueStore>,
    shell: Rc<dyn Shell>,
    token_cookie: String,
    on_change: Rc<RefCell<Option<Box<dyn Fn(&PostView)>>>>,
}

impl PostController {
    pub fn new(
        api: Rc<dyn BlogApi>,
        store: Rc<dyn KeyValueStore>,
        shell: Rc<dyn Shell>,
        token_cookie: &str,
    ) -> Self {
        PostController {
            view: Rc::new(RefCell::new(PostView::new())),
            api,
            store,
            shell,
            token_cookie: token_cookie.to_owned(),
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn view(&self) -> Rc<RefCell<PostView>> {
        self.view.clone()
    }

    pub fn init_on_change(&self, on_change: Box<dyn Fn(&PostView)>) {
        *self.on_change.borrow_mut() = Some(on_change);
        self.changed();
    }

    fn changed(&self) {
        if let Some(on_change) = &*self.on_change.borrow() {
            on_change(&self.view.borrow());
        }
    }

    fn token(&self) -> Option<String> {
        let token = read_cookie(&self.shell.cookies(), &self.token_cookie);
        if token.is_none() {
            log::warn!("no `{}` cookie, sending request without credentials", self.token_cookie);
        }
        token
    }

    pub async fn load(&self, id: Id, viewer: Option<Id>) {
        let generation = self.view.borrow_mut().begin_load(id, viewer);
        self.changed();

        let result = self.api.fetch_post(id).await;

        let applied = self
            .view
            .borrow_mut()
            .finish_load(generation, result, &*self.store);
        if applied {
            self.changed();
        }
    }

    /// Reloads the current post for a different viewer.
    pub async fn set_viewer(&self, viewer: Option<Id>) {
        let post_id = {
            let view = self.view.borrow();
            if view.viewer() == viewer && view.post_id().is_some() {
                return;
            }
            view.post_id()
        };
        match post_id {
            Some(id) => self.load(id, viewer).await,
            None => self.view.borrow_mut().viewer = viewer,
        }
    }

    pub async fn like(&self) -> LikeStatus {
        let ticket = self.view.borrow_mut().begin_like(&*self.store);
        let ticket = match ticket {
            Some(ticket) => ticket,
            None => return self.view.borrow().like_status(),
        };
        self.changed();

        let token = self.token();
        let result = self.api.toggle_like(ticket.post_id, token.as_deref()).await;

        self.view
            .borrow_mut()
            .finish_like(ticket, result, &*self.store);
        self.changed();
        self.view.borrow().like_status()
    }

    pub async fn delete(&self) -> Result<DeleteOutcome, ApiError> {
        let post_id = match self.view.borrow().post_id() {
            Some(id) => id,
            None => return Ok(DeleteOutcome::Cancelled),
        };
        if !self.shell.confirm(&DELETE_DIALOG) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let token = self.token();
        if let Err(err) = self.api.delete_post(post_id, token.as_deref()).await {
            log::error!("failed to delete blog {}: {}", post_id, err);
            return Err(err);
        }

        log::info!("deleted blog {}", post_id);
        self.shell.notify(DELETED_TITLE, DELETED_TEXT);
        self.shell.navigate(HOME_PATH);
        Ok(DeleteOutcome::Deleted)
    }
}
