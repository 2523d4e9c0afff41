// Example: load the sample document and show what each room and variant would display.
use roomlist::{DEFAULT_SIZES, Dataset, ListingOptions, RoomCard, pick_media, responsive_srcset};

fn main() -> Result<(), roomlist::DatasetError> {
    let dataset = Dataset::from_json_str(include_str!("../data/sample.json"), None)?;
    let opts = ListingOptions::default();

    for entry in dataset.items() {
        let card = RoomCard::new(&entry.room, false, &opts);
        println!("{} ({})", card.name.as_deref().unwrap_or("<unnamed>"), entry.id);
        println!("  media={:?}", card.media);
        if let Some(first) = card.gallery.first() {
            println!("  srcset={}", responsive_srcset(first));
            println!("  sizes={DEFAULT_SIZES}");
        }
        for variant in &entry.room.variants {
            println!(
                "  - {}: {:?}",
                variant.name.as_deref().unwrap_or("<unnamed>"),
                pick_media(&entry.room, Some(variant))
            );
        }
        if let Some(label) = card.toggle_label {
            println!("  [{label}] ({} of {} variants shown)", card.variants.len(), card.variant_count);
        }
    }
    Ok(())
}
