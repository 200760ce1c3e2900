/*!
 * Unix Signal Codes
 * POSIX signal table: numbers, names, default dispositions
 */

use crate::core::types::SignalCode;
use crate::signals::{SignalHubError, SignalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default disposition a platform applies when nothing handles a signal.
///
/// Informational metadata only: the manager reports it but never decides
/// process disposition itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    /// Continue the process if stopped
    Continue,
    /// Terminate the process
    Terminate,
    /// Terminate and dump core
    CoreDump,
    /// Stop the process
    Stop,
    /// No effect
    Ignore,
}

/// POSIX signal numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum UnixSignal {
    /// Hangup detected on controlling terminal or death of controlling process
    SIGHUP = 1,
    /// Interrupt from keyboard (Ctrl+C)
    SIGINT = 2,
    /// Quit from keyboard (Ctrl+\)
    SIGQUIT = 3,
    /// Illegal instruction
    SIGILL = 4,
    /// Trace/breakpoint trap
    SIGTRAP = 5,
    /// Abort signal
    SIGABRT = 6,
    /// Bus error (bad memory access)
    SIGBUS = 7,
    /// Floating-point exception
    SIGFPE = 8,
    /// Kill signal (cannot be caught or ignored)
    SIGKILL = 9,
    /// User-defined signal 1
    SIGUSR1 = 10,
    /// Invalid memory reference
    SIGSEGV = 11,
    /// User-defined signal 2
    SIGUSR2 = 12,
    /// Broken pipe
    SIGPIPE = 13,
    /// Timer signal
    SIGALRM = 14,
    /// Termination signal
    SIGTERM = 15,
    /// Child process stopped or terminated
    SIGCHLD = 17,
    /// Continue if stopped
    SIGCONT = 18,
    /// Stop process (cannot be caught or ignored)
    SIGSTOP = 19,
    /// Stop typed at terminal (Ctrl+Z)
    SIGTSTP = 20,
    /// Terminal input for background process
    SIGTTIN = 21,
    /// Terminal output for background process
    SIGTTOU = 22,
    /// Urgent condition on socket
    SIGURG = 23,
    /// CPU time limit exceeded
    SIGXCPU = 24,
    /// File size limit exceeded
    SIGXFSZ = 25,
    /// Virtual alarm clock
    SIGVTALRM = 26,
    /// Profiling timer expired
    SIGPROF = 27,
    /// Window resize signal
    SIGWINCH = 28,
    /// I/O now possible
    SIGIO = 29,
    /// Power failure
    SIGPWR = 30,
    /// Bad system call
    SIGSYS = 31,
}

impl UnixSignal {
    /// Convert from signal number
    pub fn from_code(code: SignalCode) -> SignalResult<Self> {
        match code {
            1 => Ok(UnixSignal::SIGHUP),
            2 => Ok(UnixSignal::SIGINT),
            3 => Ok(UnixSignal::SIGQUIT),
            4 => Ok(UnixSignal::SIGILL),
            5 => Ok(UnixSignal::SIGTRAP),
            6 => Ok(UnixSignal::SIGABRT),
            7 => Ok(UnixSignal::SIGBUS),
            8 => Ok(UnixSignal::SIGFPE),
            9 => Ok(UnixSignal::SIGKILL),
            10 => Ok(UnixSignal::SIGUSR1),
            11 => Ok(UnixSignal::SIGSEGV),
            12 => Ok(UnixSignal::SIGUSR2),
            13 => Ok(UnixSignal::SIGPIPE),
            14 => Ok(UnixSignal::SIGALRM),
            15 => Ok(UnixSignal::SIGTERM),
            17 => Ok(UnixSignal::SIGCHLD),
            18 => Ok(UnixSignal::SIGCONT),
            19 => Ok(UnixSignal::SIGSTOP),
            20 => Ok(UnixSignal::SIGTSTP),
            21 => Ok(UnixSignal::SIGTTIN),
            22 => Ok(UnixSignal::SIGTTOU),
            23 => Ok(UnixSignal::SIGURG),
            24 => Ok(UnixSignal::SIGXCPU),
            25 => Ok(UnixSignal::SIGXFSZ),
            26 => Ok(UnixSignal::SIGVTALRM),
            27 => Ok(UnixSignal::SIGPROF),
            28 => Ok(UnixSignal::SIGWINCH),
            29 => Ok(UnixSignal::SIGIO),
            30 => Ok(UnixSignal::SIGPWR),
            31 => Ok(UnixSignal::SIGSYS),
            _ => Err(SignalHubError::InvalidCode(code)),
        }
    }

    /// Get signal number
    pub fn code(&self) -> SignalCode {
        *self as SignalCode
    }

    /// Native signal name
    pub fn name(&self) -> &'static str {
        match self {
            UnixSignal::SIGHUP => "SIGHUP",
            UnixSignal::SIGINT => "SIGINT",
            UnixSignal::SIGQUIT => "SIGQUIT",
            UnixSignal::SIGILL => "SIGILL",
            UnixSignal::SIGTRAP => "SIGTRAP",
            UnixSignal::SIGABRT => "SIGABRT",
            UnixSignal::SIGBUS => "SIGBUS",
            UnixSignal::SIGFPE => "SIGFPE",
            UnixSignal::SIGKILL => "SIGKILL",
            UnixSignal::SIGUSR1 => "SIGUSR1",
            UnixSignal::SIGSEGV => "SIGSEGV",
            UnixSignal::SIGUSR2 => "SIGUSR2",
            UnixSignal::SIGPIPE => "SIGPIPE",
            UnixSignal::SIGALRM => "SIGALRM",
            UnixSignal::SIGTERM => "SIGTERM",
            UnixSignal::SIGCHLD => "SIGCHLD",
            UnixSignal::SIGCONT => "SIGCONT",
            UnixSignal::SIGSTOP => "SIGSTOP",
            UnixSignal::SIGTSTP => "SIGTSTP",
            UnixSignal::SIGTTIN => "SIGTTIN",
            UnixSignal::SIGTTOU => "SIGTTOU",
            UnixSignal::SIGURG => "SIGURG",
            UnixSignal::SIGXCPU => "SIGXCPU",
            UnixSignal::SIGXFSZ => "SIGXFSZ",
            UnixSignal::SIGVTALRM => "SIGVTALRM",
            UnixSignal::SIGPROF => "SIGPROF",
            UnixSignal::SIGWINCH => "SIGWINCH",
            UnixSignal::SIGIO => "SIGIO",
            UnixSignal::SIGPWR => "SIGPWR",
            UnixSignal::SIGSYS => "SIGSYS",
        }
    }

    /// Default disposition applied when the signal is unhandled
    pub fn default_disposition(&self) -> Disposition {
        match self {
            UnixSignal::SIGQUIT
            | UnixSignal::SIGILL
            | UnixSignal::SIGTRAP
            | UnixSignal::SIGABRT
            | UnixSignal::SIGBUS
            | UnixSignal::SIGFPE
            | UnixSignal::SIGSEGV
            | UnixSignal::SIGXCPU
            | UnixSignal::SIGXFSZ
            | UnixSignal::SIGSYS => Disposition::CoreDump,

            UnixSignal::SIGSTOP
            | UnixSignal::SIGTSTP
            | UnixSignal::SIGTTIN
            | UnixSignal::SIGTTOU => Disposition::Stop,

            UnixSignal::SIGCONT => Disposition::Continue,

            UnixSignal::SIGCHLD | UnixSignal::SIGURG | UnixSignal::SIGWINCH => {
                Disposition::Ignore
            }

            UnixSignal::SIGHUP
            | UnixSignal::SIGINT
            | UnixSignal::SIGKILL
            | UnixSignal::SIGUSR1
            | UnixSignal::SIGUSR2
            | UnixSignal::SIGPIPE
            | UnixSignal::SIGALRM
            | UnixSignal::SIGTERM
            | UnixSignal::SIGPROF
            | UnixSignal::SIGVTALRM
            | UnixSignal::SIGIO
            | UnixSignal::SIGPWR => Disposition::Terminate,
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            UnixSignal::SIGHUP => "Hangup",
            UnixSignal::SIGINT => "Interrupt",
            UnixSignal::SIGQUIT => "Quit",
            UnixSignal::SIGILL => "Illegal instruction",
            UnixSignal::SIGTRAP => "Trace/breakpoint trap",
            UnixSignal::SIGABRT => "Aborted",
            UnixSignal::SIGBUS => "Bus error",
            UnixSignal::SIGFPE => "Floating point exception",
            UnixSignal::SIGKILL => "Killed",
            UnixSignal::SIGUSR1 => "User defined signal 1",
            UnixSignal::SIGSEGV => "Segmentation fault",
            UnixSignal::SIGUSR2 => "User defined signal 2",
            UnixSignal::SIGPIPE => "Broken pipe",
            UnixSignal::SIGALRM => "Alarm clock",
            UnixSignal::SIGTERM => "Terminated",
            UnixSignal::SIGCHLD => "Child status changed",
            UnixSignal::SIGCONT => "Continued",
            UnixSignal::SIGSTOP => "Stopped (signal)",
            UnixSignal::SIGTSTP => "Stopped",
            UnixSignal::SIGTTIN => "Stopped (tty input)",
            UnixSignal::SIGTTOU => "Stopped (tty output)",
            UnixSignal::SIGURG => "Urgent I/O condition",
            UnixSignal::SIGXCPU => "CPU time limit exceeded",
            UnixSignal::SIGXFSZ => "File size limit exceeded",
            UnixSignal::SIGVTALRM => "Virtual timer expired",
            UnixSignal::SIGPROF => "Profiling timer expired",
            UnixSignal::SIGWINCH => "Window size changed",
            UnixSignal::SIGIO => "I/O possible",
            UnixSignal::SIGPWR => "Power failure",
            UnixSignal::SIGSYS => "Bad system call",
        }
    }
}

impl fmt::Display for UnixSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}
