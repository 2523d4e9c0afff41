// Example: simulate a scrolling UI driving a listing controller frame by frame.
use roomlist::{Body, Dataset, ListingOptions};
use roomlist_adapter::{ListingController, Region, Viewport};

const ROW_HEIGHT: u64 = 320;
const VIEWPORT_HEIGHT: u32 = 900;
const FRAME_MS: u64 = 16;

fn main() -> Result<(), roomlist::DatasetError> {
    let opts = ListingOptions::default().with_pad_to(Some(120));
    let dataset = Dataset::from_json_str(
        include_str!("../../roomlist/data/sample.json"),
        opts.pad_to,
    )?;
    println!("dataset len={}", dataset.len());

    let mut c = ListingController::new(dataset, opts);
    c.mount(0);

    let mut scroll = 0u64;
    for frame in 0..1000u64 {
        let now_ms = frame * FRAME_MS;

        // The sentinel sits right after the last rendered row.
        let rows = c.state().items.len() as u64;
        c.set_sentinel_region(Some(Region::new(rows * ROW_HEIGHT, 1)));

        // Fling downwards at a steady pace.
        scroll += 40;
        let max = (rows * ROW_HEIGHT).saturating_sub(VIEWPORT_HEIGHT as u64);
        scroll = scroll.min(max);

        if c.on_viewport(Viewport::new(scroll, VIEWPORT_HEIGHT), now_ms) {
            let view = c.view();
            let body = match view.body {
                Body::Skeleton(n) => format!("skeleton x{n}"),
                Body::Items => format!("{} items", c.state().items.len()),
            };
            println!(
                "t={now_ms}ms page={} status={:?} body={body} loading_more={} end={}",
                c.state().page,
                c.state().status,
                view.footer.loading_more,
                view.footer.end_of_results,
            );
        }
        if !c.state().has_more && !c.has_pending_fetch() {
            break;
        }
    }

    c.teardown();
    println!("after teardown: observers={}", c.observer().len());
    Ok(())
}
