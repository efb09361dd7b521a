//! Explicit view state: the last accepted snapshot and refresh sequencing.
//!
//! Hosts fetch asynchronously, so two refreshes can be in flight at once.
//! Each refresh takes a [`RefreshTicket`]; only the newest ticket may install
//! its payload, so an older fetch that finishes late never replaces a newer
//! scene.

use crate::edit::{EditForm, edit_form};
use crate::error::RenderError;
use crate::interaction::InteractionDispatcher;
use crate::ir::{HierarchyData, Tier};
use crate::layout::Layout;
use crate::render::{RenderOptions, RenderTarget, render};
use crate::store::HierarchySource;
use std::fmt::Display;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The payload was rendered and is now the current snapshot.
    Rendered(Layout),
    /// A newer refresh was started after this one; the payload was dropped.
    Stale,
    /// The fetch failed; the previous scene stays on screen.
    Failed,
}

#[derive(Debug, Default)]
pub struct Session {
    options: RenderOptions,
    issued: u64,
    data: Option<HierarchyData>,
    layout: Option<Layout>,
}

impl Session {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Last payload that made it to the screen.
    pub fn data(&self) -> Option<&HierarchyData> {
        self.data.as_ref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Install `data` if `ticket` is the newest refresh and redraw `target`.
    pub fn complete_refresh<T: RenderTarget + ?Sized>(
        &mut self,
        ticket: RefreshTicket,
        data: HierarchyData,
        target: &mut T,
    ) -> Result<RefreshOutcome, RenderError> {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                newest = self.issued,
                "dropping stale hierarchy refresh"
            );
            return Ok(RefreshOutcome::Stale);
        }
        let layout = render(target, &data, &self.options)?;
        self.data = Some(data);
        self.layout = Some(layout.clone());
        Ok(RefreshOutcome::Rendered(layout))
    }

    pub fn fail_refresh(&mut self, ticket: RefreshTicket, error: &dyn Display) -> RefreshOutcome {
        warn!(ticket = ticket.0, %error, "hierarchy refresh failed; keeping previous scene");
        RefreshOutcome::Failed
    }

    /// Fetch from `source` and redraw, as done after every create, update,
    /// delete or reset.
    pub fn refresh_from<S, T>(&mut self, source: &S, target: &mut T) -> Result<RefreshOutcome, RenderError>
    where
        S: HierarchySource + ?Sized,
        T: RenderTarget + ?Sized,
    {
        let ticket = self.begin_refresh();
        match source.fetch() {
            Ok(data) => self.complete_refresh(ticket, data, target),
            Err(err) => Ok(self.fail_refresh(ticket, &err)),
        }
    }

    /// Edit form for an item of the current snapshot.
    pub fn edit_form(&self, tier: Tier, id: i64) -> Option<EditForm> {
        edit_form(self.data.as_ref()?, tier, id)
    }

    /// Click handlers for the boxes currently on screen.
    pub fn dispatcher<F>(&self, callback: F) -> Option<InteractionDispatcher<F>>
    where
        F: FnMut(Tier, i64),
    {
        self.layout
            .as_ref()
            .map(|layout| InteractionDispatcher::attach(layout, callback))
    }
}
