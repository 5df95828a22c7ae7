use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{OverlayError, OverlayHandle, OverlayKind, OverlayResult, OverlaySpec, OverlaySurface};
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
    Create {
        handle: OverlayHandle,
        kind: OverlayKind,
        bounds: Rect,
    },
    Show(OverlayHandle),
    UpdatePosition(OverlayHandle, Point),
    Remove(OverlayHandle),
}

/// In-memory surface that records every successful call.
///
/// Failures can be injected per overlay kind and operation name
/// (`"create"`, `"show"`, `"update_position"`, `"remove"`); a failing call
/// returns an error and is not recorded.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: Cell<u64>,
    kinds: RefCell<HashMap<OverlayHandle, OverlayKind>>,
    visible: RefCell<HashSet<OverlayHandle>>,
    calls: RefCell<Vec<OverlayCall>>,
    failures: RefCell<Vec<(OverlayKind, &'static str)>>,
    trace_calls: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`RecordingSurface::new`] but also logs each call at `info`.
    pub fn traced() -> Self {
        Self {
            trace_calls: true,
            ..Self::default()
        }
    }

    pub fn fail_on(&self, kind: OverlayKind, operation: &'static str) {
        self.failures.borrow_mut().push((kind, operation));
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn handle_for(&self, kind: OverlayKind) -> Option<OverlayHandle> {
        self.kinds
            .borrow()
            .iter()
            .filter(|(_, candidate)| **candidate == kind)
            .map(|(handle, _)| *handle)
            .min()
    }

    pub fn calls_for(&self, kind: OverlayKind) -> Vec<OverlayCall> {
        let kinds = self.kinds.borrow();
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                let handle = match call {
                    OverlayCall::Create { handle, .. }
                    | OverlayCall::Show(handle)
                    | OverlayCall::UpdatePosition(handle, _)
                    | OverlayCall::Remove(handle) => handle,
                };
                kinds.get(handle) == Some(&kind)
            })
            .cloned()
            .collect()
    }

    pub fn positions_for(&self, kind: OverlayKind) -> Vec<Point> {
        self.calls_for(kind)
            .into_iter()
            .filter_map(|call| match call {
                OverlayCall::UpdatePosition(_, position) => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn is_visible(&self, kind: OverlayKind) -> bool {
        self.handle_for(kind)
            .is_some_and(|handle| self.visible.borrow().contains(&handle))
    }

    fn check(&self, kind: OverlayKind, operation: &'static str) -> OverlayResult<()> {
        let failing = self
            .failures
            .borrow()
            .iter()
            .any(|(failing_kind, failing_op)| *failing_kind == kind && *failing_op == operation);
        if failing {
            return Err(OverlayError::Surface {
                operation,
                reason: format!("injected failure for {kind:?}"),
            });
        }
        Ok(())
    }

    fn kind_of(&self, handle: OverlayHandle) -> OverlayResult<OverlayKind> {
        self.kinds
            .borrow()
            .get(&handle)
            .copied()
            .ok_or(OverlayError::UnknownHandle(handle))
    }

    fn record(&self, call: OverlayCall) {
        if self.trace_calls {
            tracing::info!(?call, "overlay call");
        }
        self.calls.borrow_mut().push(call);
    }
}

impl OverlaySurface for RecordingSurface {
    fn create(&self, spec: &OverlaySpec) -> OverlayResult<OverlayHandle> {
        self.check(spec.kind, "create")?;
        let handle = OverlayHandle(self.next_handle.get() + 1);
        self.next_handle.set(handle.0);
        self.kinds.borrow_mut().insert(handle, spec.kind);
        self.record(OverlayCall::Create {
            handle,
            kind: spec.kind,
            bounds: spec.bounds,
        });
        Ok(handle)
    }

    fn show(&self, handle: OverlayHandle) -> OverlayResult<()> {
        let kind = self.kind_of(handle)?;
        self.check(kind, "show")?;
        self.visible.borrow_mut().insert(handle);
        self.record(OverlayCall::Show(handle));
        Ok(())
    }

    fn update_position(&self, handle: OverlayHandle, position: Point) -> OverlayResult<()> {
        let kind = self.kind_of(handle)?;
        self.check(kind, "update_position")?;
        self.record(OverlayCall::UpdatePosition(handle, position));
        Ok(())
    }

    fn remove(&self, handle: OverlayHandle) -> OverlayResult<()> {
        let kind = self.kind_of(handle)?;
        self.check(kind, "remove")?;
        self.visible.borrow_mut().remove(&handle);
        self.record(OverlayCall::Remove(handle));
        Ok(())
    }
}
