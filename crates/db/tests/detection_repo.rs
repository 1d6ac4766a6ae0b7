use framebox_core::detection::Detection;
use framebox_db::repositories::DetectionRepo;
use framebox_db::{create_table_file, open_table};

/// Rows come back sorted by frame then box index regardless of insert order.
#[tokio::test]
async fn list_all_orders_by_frame_and_box_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v.sqlite");
    let pool = create_table_file(&path).await.unwrap();

    let rows = [(9, 1), (2, 0), (9, 0), (2, 2), (2, 1)].map(|(frame, box_index)| Detection {
        frame,
        box_index,
        x: 1.5,
        y: 2.5,
        width: 3.5,
        height: 4.5,
    });
    assert_eq!(DetectionRepo::insert_all(&pool, &rows).await.unwrap(), 5);
    assert_eq!(DetectionRepo::count(&pool).await.unwrap(), 5);
    pool.close().await;

    let pool = open_table(&path).await.unwrap();
    let listed = DetectionRepo::list_all(&pool).await.unwrap();
    let keys: Vec<(i64, i64)> = listed.iter().map(|r| (r.frame, r.box_index)).collect();
    assert_eq!(keys, vec![(2, 0), (2, 1), (2, 2), (9, 0), (9, 1)]);
    assert_eq!(listed[0].width, 3.5);
}

/// Files written by other tools may store coordinates as integers.
#[tokio::test]
async fn integer_coordinates_are_read_as_floats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.sqlite");
    let pool = create_table_file(&path).await.unwrap();
    sqlx::query("CREATE TABLE loose (frame, box_index, x, y, width, height)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DROP TABLE boxes").execute(&pool).await.unwrap();
    sqlx::query("ALTER TABLE loose RENAME TO boxes").execute(&pool).await.unwrap();
    sqlx::query("INSERT INTO boxes VALUES (3, 0, 10, 20, 30, 40)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pool = open_table(&path).await.unwrap();
    let listed = DetectionRepo::list_all(&pool).await.unwrap();
    let d = listed.into_iter().next().unwrap().into_detection().unwrap();
    assert_eq!((d.frame, d.x, d.height), (3, 10.0, 40.0));
}

/// Read-only handles refuse to create missing files.
#[tokio::test]
async fn open_table_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(open_table(&dir.path().join("absent.sqlite")).await.is_err());
}
