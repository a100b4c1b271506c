use esi::api::killmails::{RECENT, RECENT_BATCH_SIZE};
use esi::{Id, IdHandle, KillmailLink};
use futures::TryStreamExt;
use proptest::prelude::*;

use crate::helpers::{ME, mock_esi, serve_killmails};

proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn cursor_yields_every_link_once_in_descending_order(n in 0i64..3_200) {
        tokio_test::block_on(async move {
            let (esi, ctl) = mock_esi();
            serve_killmails(&ctl, n).await;

            let links: Vec<KillmailLink> = esi
                .character(IdHandle::Fixed(ME))
                .killmails()
                .links()
                .try_collect()
                .await
                .unwrap();

            let ids: Vec<Id> = links.iter().map(|l| l.killmail_id).collect();
            assert_eq!(ids, (1..=n).rev().collect::<Vec<_>>());

            let batch = Id::try_from(RECENT_BATCH_SIZE).unwrap();
            let expected_calls = usize::try_from(n / batch + 1).unwrap();
            assert_eq!(ctl.call_count(RECENT).await, expected_calls);
        });
    }
}
