//! Scoped context properties
//!
//! A thread-local LIFO stack of property scopes. Every event assembled on a
//! thread starts from that thread's flattened context, so a property pushed
//! here rides along on every log call made while the scope is alive:
//!
//! ```
//! use rust_log_pipeline::core::context::ContextStack;
//!
//! let _outer = ContextStack::push("A", 1);
//! {
//!     let _inner = ContextStack::push("A", 2);
//!     // innermost wins: events here see A = 2
//!     assert_eq!(ContextStack::depth(), 2);
//! }
//! // inner scope dropped: events here see A = 1 again
//! assert_eq!(ContextStack::depth(), 1);
//! ```
//!
//! Scopes must be released in push order. Dropping a scope that is not the
//! innermost is a discipline violation and panics; if the thread is already
//! unwinding the violation is reported on the diagnostic stream instead.

use crate::core::diagnostic;
use crate::core::value::{PropertyMap, PropertyValue};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ScopeFrame>> = const { RefCell::new(Vec::new()) };
}

// Process-wide counter so scope ids stay unique across threads.
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

struct ScopeFrame {
    id: u64,
    name: String,
    value: PropertyValue,
}

/// The calling thread's context stack. All operations act on the current
/// thread; stacks on different threads are fully independent.
pub struct ContextStack;

impl ContextStack {
    /// Push one property scope. The property is visible to every event
    /// assembled on this thread until the returned scope is dropped.
    /// Pushing a name that is already present shadows the outer value.
    pub fn push(name: impl Into<String>, value: impl Into<PropertyValue>) -> ContextScope {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ScopeFrame {
                id,
                name: name.into(),
                value: value.into(),
            });
        });
        ContextScope {
            id,
            _not_send: PhantomData,
        }
    }

    /// Flattened view of the stack, innermost scope winning for duplicate
    /// names.
    pub fn current_properties() -> PropertyMap {
        CONTEXT_STACK.with(|stack| {
            let stack = stack.borrow();
            let mut props = PropertyMap::new();
            for frame in stack.iter() {
                props.insert(frame.name.clone(), frame.value.clone());
            }
            props
        })
    }

    pub fn depth() -> usize {
        CONTEXT_STACK.with(|stack| stack.borrow().len())
    }

    pub fn is_empty() -> bool {
        Self::depth() == 0
    }
}

/// RAII handle for a pushed context scope. Dropping it restores the state
/// that existed before the push.
///
/// Not `Send`: a scope must be released on the thread that created it.
#[must_use = "the pushed property is removed when the returned scope is dropped"]
#[derive(Debug)]
pub struct ContextScope {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.last() {
                Some(top) if top.id == self.id => {
                    stack.pop();
                }
                _ => {
                    if std::thread::panicking() {
                        diagnostic::write(format!(
                            "context scope {} released out of order during unwind",
                            self.id
                        ));
                    } else {
                        panic!(
                            "context scope {} released out of order: not the innermost scope",
                            self.id
                        );
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_scope_wins_and_restores() {
        let _outer = ContextStack::push("A", 1);
        {
            let _inner = ContextStack::push("A", 2);
            let props = ContextStack::current_properties();
            assert_eq!(props.get("A"), Some(&PropertyValue::Int(2)));
        }
        let props = ContextStack::current_properties();
        assert_eq!(props.get("A"), Some(&PropertyValue::Int(1)));
    }

    #[test]
    fn test_distinct_names_merge() {
        let _a = ContextStack::push("A", 1);
        let _b = ContextStack::push("B", "two");
        let props = ContextStack::current_properties();
        assert_eq!(props.get("A"), Some(&PropertyValue::Int(1)));
        assert_eq!(props.get("B"), Some(&PropertyValue::String("two".to_string())));
    }

    #[test]
    fn test_stack_is_empty_after_all_scopes_drop() {
        {
            let _a = ContextStack::push("A", 1);
            let _b = ContextStack::push("B", 2);
            assert_eq!(ContextStack::depth(), 2);
        }
        assert!(ContextStack::is_empty());
    }

    #[test]
    fn test_threads_have_independent_stacks() {
        let _main = ContextStack::push("Thread", "main");
        let handle = std::thread::spawn(|| {
            assert!(ContextStack::is_empty());
            let _worker = ContextStack::push("Thread", "worker");
            ContextStack::current_properties()
                .get("Thread")
                .and_then(|v| v.as_str().map(String::from))
        });
        assert_eq!(handle.join().unwrap(), Some("worker".to_string()));
        assert_eq!(
            ContextStack::current_properties().get("Thread"),
            Some(&PropertyValue::String("main".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "released out of order")]
    fn test_out_of_order_release_panics() {
        let first = ContextStack::push("A", 1);
        let _second = ContextStack::push("B", 2);
        drop(first);
    }
}
