use thiserror::Error;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure in `modscope` is synchronous and surfaces to the immediate caller; nothing is
/// retried. A vetoed modification is *not* an error, it is reported through the unchanged return
/// value of the decorated operation.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::AlreadyBound`] - A handler was bound a second time
/// - [`Error::NotBound`] - A handler was used before being bound
/// - [`Error::InvalidArgument`] - A decoration or view argument was rejected
/// - [`Error::UnrecognizedListener`] - No registered factory understood the listener value
/// - [`Error::ViewDepthExceeded`] - Views were nested deeper than the configuration allows
///
/// ## Handler Errors
/// - [`Error::NotSupported`] - The root hooks do not implement listener registration
/// - [`Error::RootDetached`] - A view outlived the handler of the container it views
///
/// ## Operation Errors
/// - [`Error::IndexOutOfBounds`] - An index outside the container or view was supplied
/// - [`Error::KeyOutOfRange`] - A value outside a sorted view's bounds was supplied
/// - [`Error::NoCurrentElement`] - An iterator mutation was requested without a current element
///
/// # Examples
///
/// ```rust
/// use modscope::{Error, Observed};
///
/// let mut list = Observed::decorate(vec![1, 2, 3], None)?;
/// match list.remove_at(7) {
///     Err(Error::IndexOutOfBounds { index, len }) => {
///         assert_eq!((index, len), (7, 3));
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
/// # Ok::<(), modscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// `bind()` was called on a handler that is already bound.
    ///
    /// A handler belongs to exactly one decorated container. Binding it twice is a programmer
    /// error in the decorator construction code and is never recovered from.
    #[error("Handler is already bound to a container")]
    AlreadyBound,

    /// The handler was asked to raise an event before `bind()` was called.
    #[error("Handler has not been bound to a container")]
    NotBound,

    /// An argument passed to a decoration entry point or view factory was rejected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the rejected argument
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the InvalidArgument error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// None of the registered handler factories recognised the listener value.
    ///
    /// The associated value is the runtime type name of the listener.
    #[error("Unrecognized listener type - {0}")]
    UnrecognizedListener(&'static str),

    /// The root hooks do not support the requested listener operation.
    ///
    /// Listener bookkeeping is an extension point: hooks that only decide and notify are free
    /// to leave registration unimplemented.
    #[error("{0} is not supported by this handler")]
    NotSupported(&'static str),

    /// An index outside of the container (or view) was supplied.
    #[error("Index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The index that was requested
        index: usize,
        /// The length of the container or view at the time of the request
        len: usize,
    },

    /// A value outside the bounds of a sorted view was supplied.
    #[error("Value is outside the range of this view")]
    KeyOutOfRange,

    /// An iterator `remove`/`set` was requested before `next` produced an element, or after the
    /// current element was already removed.
    #[error("Iterator has no current element")]
    NoCurrentElement,

    /// Views were nested deeper than [`crate::ObservationConfig::max_view_depth`].
    ///
    /// The associated value shows the configured limit that was reached.
    #[error("Reached the maximum view nesting depth allowed - {0}")]
    ViewDepthExceeded(usize),

    /// A view handler could not reach its root handler any more.
    ///
    /// Views only hold a weak back-reference to the root; this error means the root container
    /// was dropped while a handler of one of its views was still alive.
    #[error("The root handler of this view has been dropped")]
    RootDetached,
}
