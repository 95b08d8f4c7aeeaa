//! Scriptable [`Platform`] for tests.
//!
//! Displays, failures and the starting cursor counter are configured with
//! builder methods. Input is queued as [`MockEvent`]s and replayed by
//! [`Platform::run_event_loop`] through the same [`Dispatcher`] the real
//! backend uses. Every resource is tracked so tests can assert nothing leaks.

use std::collections::{HashSet, VecDeque};

use crate::display::{Display, Rect};
use crate::dispatch::{Dispatcher, KeyEvent, KeyVerdict, SurfaceAction, SurfaceEvent};
use crate::error::PlatformError;

use super::{BrushHandle, HookHandle, Platform, SurfaceHandle};

/// One scripted input for [`MockPlatform::run_event_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    /// Delivered to the n-th created surface (creation order).
    Surface(usize, SurfaceEvent),
    /// Seen by the global hook, if one is installed.
    GlobalKey(KeyEvent),
}

/// A call the session made, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    ShowCursor(bool),
    CreateBrush,
    ReleaseBrush,
    RegisterClass,
    UnregisterClass,
    EnumerateDisplays,
    CreateSurface(usize),
    DestroySurface(SurfaceHandle),
    FocusSurface(SurfaceHandle),
    InstallHook,
    RemoveHook,
    RunEventLoop,
}

#[derive(Debug)]
struct MockSurface {
    handle: SurfaceHandle,
    rect: Rect,
    alive: bool,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    displays: Vec<Display>,
    cursor_count: i32,
    cursor_calls: usize,
    cursor_stuck: bool,

    fail_brush: bool,
    fail_class: bool,
    fail_enumeration: bool,
    fail_hook: bool,
    fail_surfaces: HashSet<usize>,

    brush: Option<BrushHandle>,
    brushes_released: usize,
    class: Option<Dispatcher>,
    surfaces: Vec<MockSurface>,
    next_handle: isize,
    focused: Option<SurfaceHandle>,
    hook: Option<(HookHandle, Dispatcher)>,

    script: VecDeque<MockEvent>,
    surface_actions: Vec<SurfaceAction>,
    key_verdicts: Vec<KeyVerdict>,
    quit: Option<i32>,
    calls: Vec<MockCall>,
}

impl MockPlatform {
    /// No displays, cursor counter at 0 (visible), nothing fails.
    pub fn new() -> Self {
        Self { next_handle: 1, ..Self::default() }
    }

    pub fn with_displays(mut self, rects: &[Rect]) -> Self {
        self.displays = rects
            .iter()
            .enumerate()
            .map(|(index, &rect)| Display { index, rect })
            .collect();
        self
    }

    pub fn with_cursor_count(mut self, count: i32) -> Self {
        self.cursor_count = count;
        self
    }

    /// ShowCursor keeps returning the starting count without moving it.
    pub fn with_stuck_cursor(mut self) -> Self {
        self.cursor_stuck = true;
        self
    }

    pub fn with_script(mut self, events: impl IntoIterator<Item = MockEvent>) -> Self {
        self.script.extend(events);
        self
    }

    pub fn fail_brush(mut self) -> Self {
        self.fail_brush = true;
        self
    }

    pub fn fail_class(mut self) -> Self {
        self.fail_class = true;
        self
    }

    pub fn fail_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn fail_hook(mut self) -> Self {
        self.fail_hook = true;
        self
    }

    /// Surface creation fails for the display with this enumeration index.
    pub fn fail_surface_at(mut self, display: usize) -> Self {
        self.fail_surfaces.insert(display);
        self
    }

    pub fn cursor_count(&self) -> i32 {
        self.cursor_count
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_count >= 0
    }

    pub fn cursor_calls(&self) -> usize {
        self.cursor_calls
    }

    pub fn brush_alive(&self) -> bool {
        self.brush.is_some()
    }

    pub fn brushes_released(&self) -> usize {
        self.brushes_released
    }

    pub fn class_registered(&self) -> bool {
        self.class.is_some()
    }

    pub fn hook_installed(&self) -> bool {
        self.hook.is_some()
    }

    pub fn focused(&self) -> Option<SurfaceHandle> {
        self.focused
    }

    /// Surfaces ever created, destroyed or not.
    pub fn surfaces_created(&self) -> usize {
        self.surfaces.len()
    }

    pub fn live_surface_count(&self) -> usize {
        self.live_surfaces().count()
    }

    pub fn live_surface_rects(&self) -> Vec<Rect> {
        self.live_surfaces().map(|s| s.rect).collect()
    }

    pub fn surface_actions(&self) -> &[SurfaceAction] {
        &self.surface_actions
    }

    pub fn key_verdicts(&self) -> &[KeyVerdict] {
        &self.key_verdicts
    }

    /// Scripted events left unconsumed after the loop ended.
    pub fn remaining_events(&self) -> usize {
        self.script.len()
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Index of the first matching call, for ordering assertions.
    pub fn call_index(&self, call: MockCall) -> Option<usize> {
        self.calls.iter().position(|c| *c == call)
    }

    fn live_surfaces(&self) -> impl Iterator<Item = &MockSurface> {
        self.surfaces
            .iter()
            .filter(|s| s.alive)
    }

    fn allocate_handle(&mut self) -> isize {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn deliver(&mut self, event: MockEvent) {
        match event {
            MockEvent::Surface(n, ev) => {
                let Some(dispatcher) = self.class else { return };
                let Some(surface) = self.surfaces.get_mut(n) else { return };
                if !surface.alive {
                    return;
                }
                let action = dispatcher.on_surface_event(ev);
                self.surface_actions.push(action);
                if action == SurfaceAction::Terminate {
                    self.quit = Some(0);
                }
            }
            MockEvent::GlobalKey(ev) => {
                let Some((_, dispatcher)) = self.hook else { return };
                let verdict = dispatcher.on_global_key(ev);
                self.key_verdicts.push(verdict);
                if verdict == KeyVerdict::ConsumeAndTerminate {
                    self.quit = Some(0);
                }
            }
        }
    }
}

impl Platform for MockPlatform {
    fn show_cursor(&mut self, show: bool) -> i32 {
        self.calls.push(MockCall::ShowCursor(show));
        self.cursor_calls += 1;
        if !self.cursor_stuck {
            self.cursor_count += if show { 1 } else { -1 };
        }
        self.cursor_count
    }

    fn create_black_brush(&mut self) -> Result<BrushHandle, PlatformError> {
        self.calls.push(MockCall::CreateBrush);
        if self.fail_brush {
            return Err(PlatformError::BrushCreation("mock".into()));
        }
        let brush = BrushHandle(self.allocate_handle());
        self.brush = Some(brush);
        Ok(brush)
    }

    fn release_brush(&mut self, brush: BrushHandle) {
        self.calls.push(MockCall::ReleaseBrush);
        assert!(
            self.live_surface_count() == 0,
            "brush released while surfaces still reference it"
        );
        if self.brush == Some(brush) {
            self.brush = None;
            self.brushes_released += 1;
        }
    }

    fn register_surface_class(
        &mut self,
        brush: BrushHandle,
        dispatcher: Dispatcher,
    ) -> Result<(), PlatformError> {
        self.calls.push(MockCall::RegisterClass);
        assert_eq!(self.brush, Some(brush), "class registered with a dead brush");
        if self.fail_class {
            return Err(PlatformError::ClassRegistration("mock".into()));
        }
        self.class = Some(dispatcher);
        Ok(())
    }

    fn unregister_surface_class(&mut self) {
        self.calls.push(MockCall::UnregisterClass);
        self.class = None;
    }

    fn enumerate_displays(&mut self) -> Result<Vec<Display>, PlatformError> {
        self.calls.push(MockCall::EnumerateDisplays);
        if self.fail_enumeration {
            return Err(PlatformError::DisplayEnumeration("mock".into()));
        }
        Ok(self.displays.clone())
    }

    fn create_surface(&mut self, display: &Display) -> Result<SurfaceHandle, PlatformError> {
        self.calls.push(MockCall::CreateSurface(display.index));
        if self.fail_surfaces.contains(&display.index) {
            return Err(PlatformError::SurfaceCreation("mock".into()));
        }
        let handle = SurfaceHandle(self.allocate_handle());
        self.surfaces.push(MockSurface {
            handle,
            rect: display.rect,
            alive: true,
        });
        Ok(handle)
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        self.calls.push(MockCall::DestroySurface(surface));
        if let Some(s) = self.surfaces.iter_mut().find(|s| s.handle == surface) {
            s.alive = false;
        }
        if self.focused == Some(surface) {
            self.focused = None;
        }
    }

    fn focus_surface(&mut self, surface: SurfaceHandle) {
        self.calls.push(MockCall::FocusSurface(surface));
        self.focused = Some(surface);
    }

    fn install_key_hook(&mut self, dispatcher: Dispatcher) -> Result<HookHandle, PlatformError> {
        self.calls.push(MockCall::InstallHook);
        if self.fail_hook {
            return Err(PlatformError::HookInstall("mock".into()));
        }
        let hook = HookHandle(self.allocate_handle());
        self.hook = Some((hook, dispatcher));
        Ok(hook)
    }

    fn remove_key_hook(&mut self, hook: HookHandle) {
        self.calls.push(MockCall::RemoveHook);
        if matches!(self.hook, Some((h, _)) if h == hook) {
            self.hook = None;
        }
    }

    /// Panics if the script runs out before a termination request, since the
    /// real loop would block forever.
    fn run_event_loop(&mut self) -> i32 {
        self.calls.push(MockCall::RunEventLoop);
        loop {
            if let Some(code) = self.quit.take() {
                return code;
            }
            let event = self
                .script
                .pop_front()
                .expect("event script exhausted without a termination request");
            self.deliver(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::KeyTransition;
    use crate::keys::VirtualKey;

    #[test]
    fn surface_events_are_ignored_without_class() {
        let mut p = MockPlatform::new().with_displays(&[Rect::new(0, 0, 10, 10)]);
        let display = p.enumerate_displays().unwrap()[0];
        p.create_surface(&display).unwrap();
        p.deliver(MockEvent::Surface(0, SurfaceEvent::Paint));
        assert!(p.surface_actions().is_empty());
    }

    #[test]
    fn global_keys_are_ignored_without_hook() {
        let esc = KeyEvent { key: VirtualKey::ESCAPE, transition: KeyTransition::Down };
        let mut p = MockPlatform::new().with_script([MockEvent::GlobalKey(esc)]);
        p.deliver(MockEvent::GlobalKey(esc));
        assert!(p.key_verdicts().is_empty());
        assert_eq!(p.remaining_events(), 1);
    }

    #[test]
    fn handles_are_unique() {
        let mut p = MockPlatform::new();
        let a = p.create_black_brush().unwrap();
        let b = p.install_key_hook(Dispatcher::default()).unwrap();
        assert_ne!(a.0, b.0);
    }
}
