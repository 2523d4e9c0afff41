use std::io::Read;
use std::sync::Arc;

use crate::error::{DatasetError, FetchError};
use crate::model::{Entry, SourceCollection};

/// One retrieved page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    /// The 1-based page number this slice was cut for.
    pub page: usize,
    /// `true` while the slice's end index is below the collection length.
    pub has_more: bool,
}

/// A backing store that serves fixed-size pages.
///
/// Pages are 1-based: page `p` covers `[(p - 1) * page_size, p * page_size)`.
pub trait PageSource<T> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<PageSlice<T>, FetchError>;
}

impl<T, S: PageSource<T> + ?Sized> PageSource<T> for &S {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<PageSlice<T>, FetchError> {
        (**self).fetch_page(page, page_size)
    }
}

impl<T, S: PageSource<T> + ?Sized> PageSource<T> for Arc<S> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<PageSlice<T>, FetchError> {
        (**self).fetch_page(page, page_size)
    }
}

/// A fixed, ordered, in-memory collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset<T = Entry> {
    items: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> From<Vec<T>> for Dataset<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Clone> PageSource<T> for Dataset<T> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<PageSlice<T>, FetchError> {
        if page == 0 || page_size == 0 {
            return Err(FetchError::InvalidRequest { page, page_size });
        }
        let len = self.items.len();
        let start = (page - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size);
        let items = self.items[start.min(len)..end.min(len)].to_vec();
        rtrace!(page, page_size, start, end, len, "Dataset::fetch_page");
        Ok(PageSlice {
            items,
            page,
            has_more: end < len,
        })
    }
}

impl Dataset<Entry> {
    /// Flattens the source document into entries.
    ///
    /// Entry ids are `{item_id}-s{serial}-r{room}`. When `pad_to` is set and the flattened list is
    /// shorter, entries are cloned round-robin with ids `{base_id}-dup-{n}` until it is reached.
    /// A source without rooms yields one placeholder entry (id = `item_id`, empty room), with
    /// default hotel details when the document has none.
    pub fn from_source(source: SourceCollection, pad_to: Option<usize>) -> Self {
        let SourceCollection {
            hotel_details,
            rooms_by_serial_no,
        } = source;
        let hotel = Arc::new(hotel_details.unwrap_or_default());
        let item_id = hotel.item_id.clone().unwrap_or_default();

        let mut items: Vec<Entry> = rooms_by_serial_no
            .into_iter()
            .enumerate()
            .flat_map(|(si, serial)| {
                let hotel = Arc::clone(&hotel);
                let item_id = item_id.clone();
                serial
                    .rooms
                    .into_iter()
                    .enumerate()
                    .map(move |(ri, room)| Entry {
                        id: format!("{item_id}-s{si}-r{ri}"),
                        hotel: Arc::clone(&hotel),
                        room,
                    })
            })
            .collect();

        if items.is_empty() {
            rdebug!(item_id = %item_id, "Dataset::from_source: no rooms, using placeholder");
            items.push(Entry {
                id: item_id,
                hotel,
                room: Default::default(),
            });
        } else if let Some(target) = pad_to {
            let base_len = items.len();
            let mut idx = 0usize;
            while items.len() < target {
                let base = &items[idx % base_len];
                let clone = Entry {
                    id: format!("{}-dup-{idx}", base.id),
                    ..base.clone()
                };
                items.push(clone);
                idx += 1;
            }
        }

        rdebug!(len = items.len(), pad_to = ?pad_to, "Dataset::from_source");
        Self { items }
    }

    pub fn from_json_str(json: &str, pad_to: Option<usize>) -> Result<Self, DatasetError> {
        let source: SourceCollection = serde_json::from_str(json)?;
        Ok(Self::from_source(source, pad_to))
    }

    pub fn from_reader(mut reader: impl Read, pad_to: Option<usize>) -> Result<Self, DatasetError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json, pad_to)
    }
}
