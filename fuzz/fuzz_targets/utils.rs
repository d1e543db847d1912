use std::str;
use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

pub const MAX_INPUT_SIZE: usize = 256 * 1024;

const TIMEOUT: Duration = Duration::from_secs(1);

/// Returns a UTF-8 view of `data` truncated to `MAX_INPUT_SIZE`.
///
/// If the truncated data is not valid UTF-8, we only try trimming up to 3 bytes to recover
/// from cutting a multibyte codepoint.
#[inline]
#[allow(dead_code)]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    for trim in 0..=3 {
        if cap < trim {
            break;
        }
        let slice = &data[..cap - trim];
        if let Ok(text) = str::from_utf8(slice) {
            return Some(text);
        }
    }
    None
}

struct Runner {
    input_tx: mpsc::SyncSender<Vec<u8>>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

/// Runs `check` on a long-lived worker thread so hangs surface as timeouts instead of
/// stalling libFuzzer.
pub fn run_with_timeout(name: &str, data: &[u8], check: fn(&[u8])) {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    let runner = RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<Vec<u8>>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            for input in input_rx {
                check(&input);
                let _ = output_tx.send(());
            }
        });

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    });

    let cap = data.len().min(MAX_INPUT_SIZE);
    runner
        .input_tx
        .send(data[..cap].to_vec())
        .unwrap_or_else(|_| panic!("{name} worker thread exited"));

    match runner
        .output_rx
        .lock()
        .unwrap_or_else(|_| panic!("{name} worker receiver poisoned"))
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("{name} fuzz target timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => panic!("{name} worker thread panicked"),
    }
}
