use super::*;
use crate::foundation::core::FrameIndex;
use proptest::prelude::*;

fn result(index: usize) -> EncodedFrame {
    EncodedFrame {
        index: FrameIndex(index),
        pages: vec![vec![index as u8; 4].into_boxed_slice()],
        page_size: 4,
        cursor: 4,
        palette: None,
    }
}

#[test]
fn fills_out_of_order_and_reads_in_order() {
    let mut table = ResultTable::new(3);
    table.insert(result(2)).unwrap();
    assert!(!table.is_full());
    assert!(table.ordered().is_err());
    table.insert(result(0)).unwrap();
    table.insert(result(1)).unwrap();
    assert!(table.is_full());
    assert_eq!(table.filled(), 3);

    let order: Vec<usize> = table.ordered().unwrap().iter().map(|f| f.index.0).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn rejects_duplicates_and_out_of_range() {
    let mut table = ResultTable::new(2);
    table.insert(result(1)).unwrap();
    assert!(matches!(
        table.insert(result(1)),
        Err(GifError::InvalidResult(_))
    ));
    assert!(matches!(
        table.insert(result(2)),
        Err(GifError::InvalidResult(_))
    ));
    assert_eq!(table.filled(), 1);
    assert_eq!(table.len(), 2);
}

proptest! {
    #[test]
    fn any_completion_order_fills_every_slot(
        order in (1usize..24).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let mut table = ResultTable::new(order.len());
        for (k, &i) in order.iter().enumerate() {
            prop_assert!(!table.is_full());
            table.insert(result(i)).unwrap();
            prop_assert_eq!(table.filled(), k + 1);
        }
        prop_assert!(table.is_full());
        let ordered = table.ordered().unwrap();
        for (i, frame) in ordered.iter().enumerate() {
            prop_assert_eq!(frame.index.0, i);
        }
    }
}
