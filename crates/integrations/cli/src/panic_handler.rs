use backtrace::Backtrace;
use log::error;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installs the panic hook and, on unix, a trap for hard native aborts.
/// The process exits on either path; a half-alive grab thread is worse
/// than no grab at all.
pub fn install(debug: bool) {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    std::env::set_var("RUST_BACKTRACE", if debug { "full" } else { "1" });

    panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let message = panic_message(panic_info);
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!(
            "PANIC in thread '{}': {} at {}",
            thread.name().unwrap_or("<unnamed>"),
            message,
            location
        );
        error!("Backtrace:\n{:?}", Backtrace::new());

        std::process::exit(1);
    }));

    install_abort_trap();
    log::info!("Panic handler installed");
}

fn panic_message(panic_info: &panic::PanicHookInfo) -> String {
    let payload = panic_info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(unix)]
fn install_abort_trap() {
    unsafe {
        use libc::{sigaction, sigemptyset, sighandler_t, SA_SIGINFO, SIGABRT, SIGSEGV};

        extern "C" fn abort_trap(
            sig: libc::c_int,
            _: *mut libc::siginfo_t,
            _: *mut libc::c_void,
        ) {
            let sig_name = match sig {
                SIGABRT => "SIGABRT",
                SIGSEGV => "SIGSEGV",
                _ => "UNKNOWN",
            };

            eprintln!("\nCaught signal {} - likely a crash inside the platform hook", sig_name);
            eprintln!("Native backtrace:\n{:?}", Backtrace::new());

            std::process::exit(134);
        }

        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = abort_trap as sighandler_t;
        action.sa_flags = SA_SIGINFO;
        sigemptyset(&mut action.sa_mask);

        sigaction(SIGABRT, &action, std::ptr::null_mut());
        sigaction(SIGSEGV, &action, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
fn install_abort_trap() {}
