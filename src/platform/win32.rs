// Win32 backend.
//
// One WS_POPUP | WS_EX_TOPMOST window per monitor, painted with a shared GDI
// brush, plus a WH_KEYBOARD_LL hook. The window procedure and the hook are
// plain callbacks, so the dispatcher and brush they need live in thread-locals
// owned by this thread; everything runs on the thread that pumps messages.

use std::cell::Cell;
use std::ffi::c_void;

use tracing::{debug, error, trace};
use windows::core::{BOOL, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HMODULE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, EnumDisplayMonitors, FillRect,
    GetMonitorInfoW, UpdateWindow, HBRUSH, HDC, HGDIOBJ, HMONITOR, MONITORINFO, PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    PostQuitMessage, RegisterClassW, SetCursor, SetForegroundWindow, SetWindowPos,
    SetWindowsHookExW, ShowCursor, ShowWindow, TranslateMessage, UnhookWindowsHookEx,
    UnregisterClassW, HC_ACTION, HHOOK, HWND_TOPMOST, KBDLLHOOKSTRUCT, MSG, SWP_SHOWWINDOW,
    SW_SHOW, WH_KEYBOARD_LL, WM_ERASEBKGND, WM_KEYDOWN, WM_KEYUP, WM_PAINT, WM_SETCURSOR,
    WM_SYSCOMMAND, WM_SYSKEYDOWN, WM_SYSKEYUP, WNDCLASSW, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_POPUP,
};

use super::{BrushHandle, HookHandle, Platform, SurfaceHandle};
use crate::display::{Display, Rect};
use crate::dispatch::{
    Dispatcher, KeyEvent, KeyTransition, KeyVerdict, SurfaceAction, SurfaceEvent,
};
use crate::error::PlatformError;
use crate::keys::VirtualKey;

const CLASS_NAME: &str = "FakeShutdownBlackOverlay\0";

#[derive(Clone, Copy)]
struct SurfaceHandlers {
    brush: isize,
    dispatcher: Dispatcher,
}

thread_local! {
    static SURFACE_HANDLERS: Cell<Option<SurfaceHandlers>> = const { Cell::new(None) };
    static HOOK_DISPATCHER: Cell<Option<Dispatcher>> = const { Cell::new(None) };
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn last_error() -> String {
    std::io::Error::last_os_error().to_string()
}

fn hwnd(surface: SurfaceHandle) -> HWND {
    HWND(surface.0 as *mut c_void)
}

pub struct Win32Platform {
    hinstance: HMODULE,
    class_name: Vec<u16>,
}

impl Win32Platform {
    pub fn new() -> Self {
        let hinstance = unsafe { GetModuleHandleW(PCWSTR::null()).unwrap_or_default() };
        Self {
            hinstance,
            class_name: wide(CLASS_NAME),
        }
    }
}

impl Default for Win32Platform {
    fn default() -> Self {
        Self::new()
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(handlers) = SURFACE_HANDLERS.with(Cell::get) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    let event = match msg {
        WM_PAINT => SurfaceEvent::Paint,
        WM_ERASEBKGND => SurfaceEvent::EraseBackground,
        WM_SETCURSOR => SurfaceEvent::SetCursor,
        WM_KEYDOWN | WM_SYSKEYDOWN => SurfaceEvent::KeyDown(VirtualKey(wparam.0 as u32)),
        WM_SYSCOMMAND => SurfaceEvent::SysCommand(wparam.0),
        _ => SurfaceEvent::Other,
    };

    match handlers.dispatcher.on_surface_event(event) {
        SurfaceAction::FillBlack => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            FillRect(hdc, &ps.rcPaint, HBRUSH(handlers.brush as *mut c_void));
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        SurfaceAction::SkipErase => LRESULT(1),
        SurfaceAction::HideCursor => {
            let _ = SetCursor(None);
            LRESULT(1)
        }
        SurfaceAction::Terminate => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        SurfaceAction::Swallow => LRESULT(0),
        SurfaceAction::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Must return quickly: Windows silently drops hooks that stall.
unsafe extern "system" fn keyboard_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        let kb = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
        let transition = match wparam.0 as u32 {
            WM_KEYDOWN => Some(KeyTransition::Down),
            WM_SYSKEYDOWN => Some(KeyTransition::SysDown),
            WM_KEYUP => Some(KeyTransition::Up),
            WM_SYSKEYUP => Some(KeyTransition::SysUp),
            _ => None,
        };

        if let (Some(transition), Some(dispatcher)) = (transition, HOOK_DISPATCHER.with(Cell::get)) {
            let event = KeyEvent { key: VirtualKey(kb.vkCode), transition };
            if dispatcher.on_global_key(event) == KeyVerdict::ConsumeAndTerminate {
                trace!("exit key consumed by hook");
                PostQuitMessage(0);
                return LRESULT(1);
            }
        }
    }

    CallNextHookEx(None, code, wparam, lparam)
}

/// EnumDisplayMonitors callback. `lparam` points at the caller's `Vec<Display>`.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<Display>);

    let mut mi = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut mi).as_bool() {
        let r = mi.rcMonitor;
        displays.push(Display {
            index: displays.len(),
            rect: Rect::new(r.left, r.top, r.right, r.bottom),
        });
    } else {
        debug!(error = %last_error(), "GetMonitorInfoW failed, skipping monitor");
    }

    BOOL::from(true)
}

impl Platform for Win32Platform {
    fn show_cursor(&mut self, show: bool) -> i32 {
        unsafe { ShowCursor(show) }
    }

    fn create_black_brush(&mut self) -> Result<BrushHandle, PlatformError> {
        let brush = unsafe { CreateSolidBrush(COLORREF(0)) };
        if brush.is_invalid() {
            return Err(PlatformError::BrushCreation(last_error()));
        }
        Ok(BrushHandle(brush.0 as isize))
    }

    fn release_brush(&mut self, brush: BrushHandle) {
        unsafe {
            let _ = DeleteObject(HGDIOBJ::from(HBRUSH(brush.0 as *mut c_void)));
        }
    }

    fn register_surface_class(
        &mut self,
        brush: BrushHandle,
        dispatcher: Dispatcher,
    ) -> Result<(), PlatformError> {
        SURFACE_HANDLERS.with(|h| h.set(Some(SurfaceHandlers { brush: brush.0, dispatcher })));

        // No class cursor: WM_SETCURSOR clears it anyway, and a null cursor
        // avoids a flash of the arrow before the first query. No class brush
        // either: UnregisterClassW would delete it, and WM_PAINT fills with it.
        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: self.hinstance.into(),
            lpszClassName: PCWSTR(self.class_name.as_ptr()),
            ..Default::default()
        };

        if unsafe { RegisterClassW(&wc) } == 0 {
            SURFACE_HANDLERS.with(|h| h.set(None));
            return Err(PlatformError::ClassRegistration(last_error()));
        }
        Ok(())
    }

    fn unregister_surface_class(&mut self) {
        unsafe {
            let _ = UnregisterClassW(PCWSTR(self.class_name.as_ptr()), Some(self.hinstance.into()));
        }
        SURFACE_HANDLERS.with(|h| h.set(None));
    }

    fn enumerate_displays(&mut self) -> Result<Vec<Display>, PlatformError> {
        let mut displays: Vec<Display> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut displays as *mut Vec<Display> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(PlatformError::DisplayEnumeration(last_error()));
        }
        Ok(displays)
    }

    fn create_surface(&mut self, display: &Display) -> Result<SurfaceHandle, PlatformError> {
        let r = display.rect;
        unsafe {
            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                PCWSTR(self.class_name.as_ptr()),
                PCWSTR::null(),
                WS_POPUP,
                r.left,
                r.top,
                r.width(),
                r.height(),
                None,
                None,
                Some(self.hinstance.into()),
                None,
            )
            .map_err(|e| PlatformError::SurfaceCreation(e.to_string()))?;

            let _ = SetWindowPos(
                hwnd,
                Some(HWND_TOPMOST),
                r.left,
                r.top,
                r.width(),
                r.height(),
                SWP_SHOWWINDOW,
            );
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);

            Ok(SurfaceHandle(hwnd.0 as isize))
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        unsafe {
            if let Err(e) = DestroyWindow(hwnd(surface)) {
                debug!(error = %e, "DestroyWindow failed");
            }
        }
    }

    fn focus_surface(&mut self, surface: SurfaceHandle) {
        unsafe {
            let _ = SetForegroundWindow(hwnd(surface));
            let _ = SetFocus(Some(hwnd(surface)));
        }
    }

    fn install_key_hook(&mut self, dispatcher: Dispatcher) -> Result<HookHandle, PlatformError> {
        HOOK_DISPATCHER.with(|h| h.set(Some(dispatcher)));
        let installed = unsafe {
            SetWindowsHookExW(
                WH_KEYBOARD_LL,
                Some(keyboard_hook_proc),
                Some(self.hinstance.into()),
                0,
            )
        };
        match installed {
            Ok(hook) => Ok(HookHandle(hook.0 as isize)),
            Err(e) => {
                HOOK_DISPATCHER.with(|h| h.set(None));
                Err(PlatformError::HookInstall(e.to_string()))
            }
        }
    }

    fn remove_key_hook(&mut self, hook: HookHandle) {
        unsafe {
            let _ = UnhookWindowsHookEx(HHOOK(hook.0 as *mut c_void));
        }
        HOOK_DISPATCHER.with(|h| h.set(None));
    }

    fn run_event_loop(&mut self) -> i32 {
        let mut msg = MSG::default();
        unsafe {
            loop {
                let ret = GetMessageW(&mut msg, None, 0, 0).0;
                if ret == 0 {
                    // WM_QUIT carries the PostQuitMessage code
                    return msg.wParam.0 as i32;
                }
                if ret < 0 {
                    error!(error = %last_error(), "GetMessageW failed");
                    return 1;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}
