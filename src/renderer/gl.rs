#![allow(clippy::all, non_upper_case_globals, unused)]

use std::borrow::Cow;
use std::ffi::{c_void, CString};

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

/// Runs the given (unsafe) OpenGL call, and in debug builds, panics if
/// glGetError reports an error afterwards.
macro_rules! call {
    ($expr:expr) => {{
        let result = unsafe { $expr };
        if cfg!(debug_assertions) {
            let error = unsafe { $crate::renderer::gl::GetError() };
            if error != $crate::renderer::gl::NO_ERROR {
                panic!(
                    "OpenGL error {} at {}:{}:{}",
                    $crate::renderer::gl::error_name(error),
                    file!(),
                    line!(),
                    column!(),
                );
            }
        }
        result
    }};
}
pub(crate) use call;

pub fn error_name(error: types::GLenum) -> Cow<'static, str> {
    match error {
        INVALID_ENUM => Cow::Borrowed("INVALID_ENUM"),
        INVALID_VALUE => Cow::Borrowed("INVALID_VALUE"),
        INVALID_OPERATION => Cow::Borrowed("INVALID_OPERATION"),
        OUT_OF_MEMORY => Cow::Borrowed("OUT_OF_MEMORY"),
        INVALID_FRAMEBUFFER_OPERATION => Cow::Borrowed("INVALID_FRAMEBUFFER_OPERATION"),
        _ => Cow::Owned(format!("{error}")),
    }
}

/// Returns the location of the named uniform, or -1 if the program has no
/// active uniform by that name (which OpenGL silently ignores when set).
pub fn get_uniform_location(program: types::GLuint, name: &str) -> types::GLint {
    let Ok(name) = CString::new(name) else {
        return -1;
    };
    call!(GetUniformLocation(program, name.as_ptr()))
}

/// Byte offsets into bound buffers are passed to OpenGL as pointers.
pub fn offset_ptr(offset: usize) -> *const c_void {
    offset as *const c_void
}

/// Turns a nul-padded info log buffer into a string. The log ends at the
/// reported length or the first nul, whichever comes first.
pub fn info_log_to_string(buffer: &[u8], length: types::GLsizei) -> String {
    let nul = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    let length = (length.max(0) as usize).min(nul);
    String::from_utf8_lossy(&buffer[..length]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_errors_have_names() {
        assert_eq!("INVALID_ENUM", error_name(INVALID_ENUM));
        assert_eq!("INVALID_FRAMEBUFFER_OPERATION", error_name(INVALID_FRAMEBUFFER_OPERATION));
        assert_eq!("12345", error_name(12345));
    }

    #[test]
    fn info_log_is_cut_at_reported_length() {
        let mut buffer = [0u8; 32];
        buffer[..6].copy_from_slice(b"oops\n\n");
        assert_eq!("oops", info_log_to_string(&buffer, 6));
        assert_eq!("", info_log_to_string(&buffer, -1));
        assert_eq!("oops", info_log_to_string(&buffer, 100));
        assert_eq!("oops", info_log_to_string(&buffer, 32));
        assert_eq!("oo", info_log_to_string(&buffer, 2));
    }
}
