use std::marker::PhantomData;

/// One chunk of a remote listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token to request the following page, `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Lazy sequence over the pages of a remote listing.
///
/// A page is requested only when `next()` is called, so a consumer which
/// stops iterating early never causes the rest of the listing to be fetched.
/// The sequence ends after the last page or right after the first error.
pub struct Pages<T, E, F> {
    fetch: F,
    next_token: Option<String>,
    end_of_stream: bool,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E, F> Pages<T, E, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
{
    pub fn new(fetch: F) -> Self {
        Pages {
            fetch,
            next_token: None,
            end_of_stream: false,
            _marker: PhantomData,
        }
    }
}

impl<T, E, F> Iterator for Pages<T, E, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end_of_stream {
            return None;
        }

        let page = match (self.fetch)(self.next_token.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                self.end_of_stream = true;
                return Some(Err(e));
            }
        };
        self.next_token = page.next_page_token;
        self.end_of_stream = self.next_token.is_none();
        Some(Ok(page.items))
    }
}
