//! Notices and their delivery.
//!
//! Delivery is simulated: each message is logged and counted, nothing leaves
//! the process. Recipients per target and channel:
//!
//! | target        | sms                    | email              |
//! |---------------|------------------------|--------------------|
//! | `student:<id>`| each parent's phone    | the student's email|
//! | `parent:<id>` | the parent's phone     | none               |
//! | `class:<id>`  | broadcast              | broadcast          |
//! | `all`         | broadcast              | broadcast          |

use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::UserId;
use rollbook_models::notifications::{
    Delivery, DeliveryChannel, Notification, NotificationDispatch, NotificationFilterParams,
    NotificationTarget, SendNotificationDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::metrics::track_notification_sent;

const NOTIFICATION_COLUMNS: &str = "id, title, content, target, sender_id, created_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &NotificationFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(target) = filter.target.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND target ILIKE ").push_bind(format!("%{}%", target));
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", keyword);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Keeps the first occurrence of each channel.
fn dedup_channels(channels: Vec<DeliveryChannel>) -> Vec<DeliveryChannel> {
    let mut unique = Vec::with_capacity(channels.len());
    for channel in channels {
        if !unique.contains(&channel) {
            unique.push(channel);
        }
    }
    unique
}

/// Concrete recipients for a student or parent target. `404` when the
/// addressed record does not exist. Broadcast targets yield no recipients.
async fn resolve_recipients(
    db: &PgPool,
    target: NotificationTarget,
    channels: &[DeliveryChannel],
) -> Result<Vec<Delivery>, AppError> {
    let mut deliveries = Vec::new();
    match target {
        NotificationTarget::All => {}
        NotificationTarget::Class(id) => {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
                    .bind(id)
                    .fetch_one(db)
                    .await?;
            if !exists {
                return Err(AppError::not_found(anyhow!("Class {} not found", id)));
            }
        }
        NotificationTarget::Student(id) => {
            let email: Option<Option<String>> =
                sqlx::query_scalar("SELECT email FROM students WHERE id = $1")
                    .bind(id)
                    .fetch_optional(db)
                    .await?;
            let email = email.ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", id)))?;

            for &channel in channels {
                match channel {
                    DeliveryChannel::Sms => {
                        let phones: Vec<String> = sqlx::query_scalar(
                            r#"SELECT phone FROM parents
                            WHERE student_id = $1 AND phone IS NOT NULL AND phone <> ''
                            ORDER BY created_at, id"#,
                        )
                        .bind(id)
                        .fetch_all(db)
                        .await?;
                        deliveries.extend(phones.into_iter().map(|recipient| Delivery {
                            channel,
                            recipient,
                        }));
                    }
                    DeliveryChannel::Email => {
                        if let Some(recipient) = email.clone().filter(|e| !e.is_empty()) {
                            deliveries.push(Delivery { channel, recipient });
                        }
                    }
                }
            }
        }
        NotificationTarget::Parent(id) => {
            let phone: Option<Option<String>> =
                sqlx::query_scalar("SELECT phone FROM parents WHERE id = $1")
                    .bind(id)
                    .fetch_optional(db)
                    .await?;
            let phone = phone.ok_or_else(|| AppError::not_found(anyhow!("Parent {} not found", id)))?;

            if channels.contains(&DeliveryChannel::Sms) {
                if let Some(recipient) = phone.filter(|p| !p.is_empty()) {
                    deliveries.push(Delivery {
                        channel: DeliveryChannel::Sms,
                        recipient,
                    });
                }
            }
        }
    }
    Ok(deliveries)
}

pub struct NotificationService;

impl NotificationService {
    /// Newest first.
    #[instrument(skip(db))]
    pub async fn list_notifications(
        db: &PgPool,
        filter: NotificationFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Notification>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM notifications",
            NOTIFICATION_COLUMNS
        ));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let notifications = qb.build_query_as::<Notification>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM notifications");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(notifications, total, &pagination))
    }

    /// Stores the notice, then simulates delivery on each requested channel.
    #[instrument(skip(db, dto), fields(target = %dto.target))]
    pub async fn send(
        db: &PgPool,
        sender_id: UserId,
        dto: SendNotificationDto,
    ) -> Result<NotificationDispatch, AppError> {
        let channels = dedup_channels(dto.channels);
        let deliveries = resolve_recipients(db, dto.target, &channels).await?;

        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"INSERT INTO notifications (title, content, target, sender_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            NOTIFICATION_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.target.to_string())
        .bind(sender_id)
        .fetch_one(db)
        .await?;

        for delivery in &deliveries {
            track_notification_sent(delivery.channel.as_str());
            info!(
                notification_id = %notification.id,
                channel = delivery.channel.as_str(),
                recipient = %delivery.recipient,
                "Notification delivered"
            );
        }

        let broadcast = matches!(
            dto.target,
            NotificationTarget::All | NotificationTarget::Class(_)
        );
        info!(
            notification_id = %notification.id,
            broadcast,
            sent = deliveries.len(),
            "Notification sent"
        );

        Ok(NotificationDispatch {
            notification,
            channels,
            broadcast,
            sent_count: deliveries.len(),
            deliveries,
        })
    }
}
