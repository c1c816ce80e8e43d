use crate::file::FileObject;
use crate::push::FileStream;
use async_stream::stream;
use futures_util::StreamExt;
use std::sync::Arc;

/// A Pipe is a stage that a push stream can be piped into.
/// It's a function from a file stream to a file stream; stages only touch
/// `Ok` files and let errors through untouched.
pub struct Pipe {
    f: Arc<dyn Fn(FileStream) -> FileStream + Send + Sync + 'static>,
}

impl Clone for Pipe {
    fn clone(&self) -> Self {
        Pipe {
            f: Arc::clone(&self.f),
        }
    }
}

impl Pipe {
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(FileStream) -> FileStream + Send + Sync + 'static,
    {
        Pipe { f: Arc::new(f) }
    }

    /// Apply this pipe to a file stream
    pub fn apply(&self, input: FileStream) -> FileStream {
        (self.f)(input)
    }
}

/// Create a pipe that transforms each file
pub fn map<F>(f: F) -> Pipe
where
    F: Fn(FileObject) -> FileObject + Send + Sync + Clone + 'static,
{
    Pipe::new(move |input| {
        let f = f.clone();
        input.map(move |item| item.map(&f)).boxed()
    })
}

/// Create a pipe that drops files failing the predicate
pub fn filter<F>(predicate: F) -> Pipe
where
    F: Fn(&FileObject) -> bool + Send + Sync + Clone + 'static,
{
    Pipe::new(move |input| {
        let predicate = predicate.clone();
        stream! {
            let mut s = input;
            while let Some(item) = s.next().await {
                if let Ok(file) = &item {
                    if !predicate(file) {
                        continue;
                    }
                }
                yield item;
            }
        }
        .boxed()
    })
}

/// Create a pipe that observes each file without changing it
pub fn inspect<F>(f: F) -> Pipe
where
    F: Fn(&FileObject) + Send + Sync + Clone + 'static,
{
    Pipe::new(move |input| {
        let f = f.clone();
        input
            .inspect(move |item| {
                if let Ok(file) = item {
                    f(file);
                }
            })
            .boxed()
    })
}

/// Create a pipe that rewrites every file's extension, e.g. `.hbs` to `.html`
pub fn set_extname(ext: &str) -> Pipe {
    let ext = ext.to_string();
    map(move |mut file: FileObject| {
        file.set_extname(&ext);
        file
    })
}

/// Compose two pipes together
pub fn compose(p1: Pipe, p2: Pipe) -> Pipe {
    Pipe::new(move |input| p2.apply(p1.apply(input)))
}

/// Identity pipe that passes files through unchanged
pub fn identity() -> Pipe {
    Pipe::new(|input| input)
}

/// Extension trait for pipes
pub trait PipeExt {
    /// Compose this pipe with another pipe
    fn compose(self, other: Pipe) -> Pipe;
}

impl PipeExt for Pipe {
    fn compose(self, other: Pipe) -> Pipe {
        compose(self, other)
    }
}
