use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{BubbleController, BubbleEnvironment};
use crate::config::BubbleBuilder;
use crate::error::{BubbleError, BubbleResult};
use crate::icon::IconResolver;
use crate::listener::{BubbleAction, BubbleListener};
use crate::overlay::OverlayResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultView {
    Bubble,
    ExpandableView,
}

/// Host-provided full view the bubble can expand into.
pub trait ExpandableView {
    fn show(&self) -> OverlayResult<()>;
    fn remove(&self) -> OverlayResult<()>;
}

/// Capabilities offered to an expandable view.
pub trait ExpandableAction {
    fn pop_to_bubble(&self) {}
}

/// Hook into the hosting process, called once the bubble service stops.
pub trait HostLifecycle {
    fn stop(&self) {}
}

/// Switches a host between its bubble and an optional expandable view.
///
/// Releasing the bubble in the close zone stops the service: every view is
/// removed and the host lifecycle is notified.
pub struct BubbleService {
    env: BubbleEnvironment,
    bubble: RefCell<Option<Rc<BubbleController>>>,
    expandable: RefCell<Option<Rc<dyn ExpandableView>>>,
    host: Option<Rc<dyn HostLifecycle>>,
    running: Cell<bool>,
    this: Weak<BubbleService>,
}

impl BubbleService {
    pub fn new(env: BubbleEnvironment, host: Option<Rc<dyn HostLifecycle>>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            env,
            bubble: RefCell::new(None),
            expandable: RefCell::new(None),
            host,
            running: Cell::new(false),
            this: this.clone(),
        })
    }

    /// Builds the bubble from `setup_bubble` and shows `default_view`.
    ///
    /// The service registers its own listener after the caller's, so
    /// caller listeners see every event first.
    pub fn setup<F>(
        &self,
        default_view: DefaultView,
        resolver: &dyn IconResolver,
        setup_bubble: F,
    ) -> BubbleResult<()>
    where
        F: FnOnce(Rc<dyn BubbleAction>) -> BubbleBuilder,
    {
        let action: Rc<dyn BubbleAction> = Rc::new(ServiceHandle(self.this.clone()));
        let listener: Rc<dyn BubbleListener> = Rc::new(ServiceHandle(self.this.clone()));
        let config = setup_bubble(action).add_listener(listener).build(resolver)?;

        let previous = self
            .bubble
            .replace(Some(Rc::new(BubbleController::new(config, &self.env))));
        if let Some(previous) = previous {
            previous.remove();
        }
        self.running.set(true);
        tracing::info!(?default_view, "bubble service started");

        match default_view {
            DefaultView::Bubble => self.show_bubble(),
            DefaultView::ExpandableView => self.show_expandable(),
        }
        Ok(())
    }

    pub fn set_expandable_view(&self, view: Option<Rc<dyn ExpandableView>>) {
        *self.expandable.borrow_mut() = view;
    }

    pub fn expandable_action(&self) -> Rc<dyn ExpandableAction> {
        Rc::new(ServiceHandle(self.this.clone()))
    }

    pub fn bubble(&self) -> Option<Rc<BubbleController>> {
        self.bubble.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Shows the expandable view and takes the bubble off screen.
    pub fn navigate_to_expandable_view(&self) -> BubbleResult<()> {
        let Some(view) = self.expandable.borrow().clone() else {
            return Err(BubbleError::UnsupportedNavigation);
        };
        match view.show() {
            Ok(()) => self.remove_bubble(),
            Err(err) => tracing::warn!(%err, "expandable view failed to show; keeping bubble"),
        }
        Ok(())
    }

    pub fn pop_to_bubble(&self) {
        self.remove_expandable();
        self.show_bubble();
    }

    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        self.remove_expandable();
        self.remove_bubble();
        tracing::info!("bubble service stopped");
        if let Some(host) = &self.host {
            host.stop();
        }
    }

    fn show_bubble(&self) {
        if let Some(bubble) = self.bubble() {
            bubble.show();
        }
    }

    fn remove_bubble(&self) {
        if let Some(bubble) = self.bubble() {
            bubble.remove();
        }
    }

    fn show_expandable(&self) {
        let view = self.expandable.borrow().clone();
        match view {
            Some(view) => {
                if let Err(err) = view.show() {
                    tracing::warn!(%err, "expandable view failed to show");
                }
            }
            None => tracing::warn!("no expandable view configured; nothing shown"),
        }
    }

    fn remove_expandable(&self) {
        let view = self.expandable.borrow().clone();
        if let Some(view) = view {
            if let Err(err) = view.remove() {
                tracing::warn!(%err, "expandable view failed to remove");
            }
        }
    }
}

struct ServiceHandle(Weak<BubbleService>);

impl BubbleAction for ServiceHandle {
    fn navigate_to_expandable_view(&self) -> BubbleResult<()> {
        match self.0.upgrade() {
            Some(service) => service.navigate_to_expandable_view(),
            None => Ok(()),
        }
    }
}

impl BubbleListener for ServiceHandle {
    fn on_destroy(&self) {
        if let Some(service) = self.0.upgrade() {
            service.stop();
        }
    }
}

impl ExpandableAction for ServiceHandle {
    fn pop_to_bubble(&self) {
        if let Some(service) = self.0.upgrade() {
            service.pop_to_bubble();
        }
    }
}
