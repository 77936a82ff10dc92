//! Humidor and Cigar Routes
//!
//! All humidor routes act on the signed-in user's own humidors.
//!
//! - GET /api/v1/humidors - List own humidors
//! - POST /api/v1/humidors - Create a humidor
//! - GET /api/v1/humidors/:id - Get a humidor
//! - PATCH /api/v1/humidors/:id - Update a humidor
//! - DELETE /api/v1/humidors/:id - Delete a humidor and its cigars
//! - GET /api/v1/humidors/:id/cigars - List cigars
//! - POST /api/v1/humidors/:id/cigars - Add a cigar
//! - PATCH /api/v1/cigars/:id - Update a cigar (quantity, notes, move)
//! - DELETE /api/v1/cigars/:id - Remove a cigar

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::mock::error::{MockError, MockResult};
use crate::mock::state::{MockState, Store};
use crate::models::{Cigar, CigarUpdate, Envelope, Humidor, HumidorUpdate, NewCigar, NewHumidor};

fn check_humidity(value: Option<u8>) -> MockResult<()> {
    match value {
        Some(h) if !(50..=85).contains(&h) => Err(MockError::Validation(format!(
            "Target humidity {}% is outside 50-85%",
            h
        ))),
        _ => Ok(()),
    }
}

/// Index of a cigar whose humidor belongs to `viewer`
fn owned_cigar_index(store: &Store, id: &str, viewer: &str) -> MockResult<usize> {
    let idx = store
        .cigars
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| MockError::NotFound(format!("Cigar {} not found", id)))?;
    store
        .owned_humidor(&store.cigars[idx].humidor_id, viewer)
        .map_err(|_| MockError::NotFound(format!("Cigar {} not found", id)))?;
    Ok(idx)
}

/// GET /api/v1/humidors
pub async fn list_humidors(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> MockResult<Json<Envelope<Vec<Humidor>>>> {
    let store = state.store.read().await;
    let viewer = store.require_viewer(&headers)?;

    let humidors = store
        .humidors
        .iter()
        .filter(|h| h.owner_id == viewer)
        .map(|h| store.render_humidor(h))
        .collect();

    Ok(Json(Envelope::new(humidors)))
}

/// POST /api/v1/humidors
pub async fn create_humidor(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<NewHumidor>,
) -> MockResult<(StatusCode, Json<Envelope<Humidor>>)> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;

    if req.name.trim().is_empty() {
        return Err(MockError::Validation("Humidor name is required".to_string()));
    }
    check_humidity(req.target_humidity)?;

    let humidor = Humidor {
        id: store.next_id("h"),
        owner_id: viewer,
        name: req.name.trim().to_string(),
        description: req.description,
        target_humidity: req.target_humidity,
        cigar_count: 0,
        created_at: Utc::now(),
    };
    store.humidors.push(humidor.clone());

    Ok((StatusCode::CREATED, Json(Envelope::new(humidor))))
}

/// GET /api/v1/humidors/:id
pub async fn get_humidor(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<Json<Envelope<Humidor>>> {
    let store = state.store.read().await;
    let viewer = store.require_viewer(&headers)?;
    let humidor = store.owned_humidor(&id, &viewer)?;
    Ok(Json(Envelope::new(store.render_humidor(humidor))))
}

/// PATCH /api/v1/humidors/:id
pub async fn update_humidor(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<HumidorUpdate>,
) -> MockResult<Json<Envelope<Humidor>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.owned_humidor(&id, &viewer)?;
    check_humidity(req.target_humidity)?;
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(MockError::Validation("Humidor name is required".to_string()));
    }

    let humidor = store
        .humidors
        .iter_mut()
        .find(|h| h.id == id)
        .ok_or_else(|| MockError::NotFound(format!("Humidor {} not found", id)))?;
    if let Some(name) = req.name {
        humidor.name = name.trim().to_string();
    }
    if let Some(description) = req.description {
        humidor.description = Some(description).filter(|d| !d.is_empty());
    }
    if let Some(target) = req.target_humidity {
        humidor.target_humidity = Some(target);
    }

    let humidor = humidor.clone();
    Ok(Json(Envelope::new(store.render_humidor(&humidor))))
}

/// DELETE /api/v1/humidors/:id
pub async fn delete_humidor(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.owned_humidor(&id, &viewer)?;

    store.humidors.retain(|h| h.id != id);
    store.cigars.retain(|c| c.humidor_id != id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/humidors/:id/cigars
pub async fn list_cigars(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<Json<Envelope<Vec<Cigar>>>> {
    let store = state.store.read().await;
    let viewer = store.require_viewer(&headers)?;
    store.owned_humidor(&id, &viewer)?;

    let cigars = store
        .cigars
        .iter()
        .filter(|c| c.humidor_id == id)
        .cloned()
        .collect();
    Ok(Json(Envelope::new(cigars)))
}

/// POST /api/v1/humidors/:id/cigars
pub async fn add_cigar(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<NewCigar>,
) -> MockResult<(StatusCode, Json<Envelope<Cigar>>)> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.owned_humidor(&id, &viewer)?;

    if req.brand.trim().is_empty() || req.name.trim().is_empty() {
        return Err(MockError::Validation("Brand and name are required".to_string()));
    }
    if req.quantity == 0 {
        return Err(MockError::Validation("Quantity must be at least 1".to_string()));
    }

    let cigar = Cigar {
        id: store.next_id("g"),
        humidor_id: id,
        brand: req.brand.trim().to_string(),
        name: req.name.trim().to_string(),
        vitola: req.vitola,
        wrapper: req.wrapper,
        origin: req.origin,
        strength: req.strength,
        quantity: req.quantity,
        price_cents: req.price_cents,
        acquired_on: req.acquired_on,
        notes: req.notes,
        image_url: req.image_url,
    };
    store.cigars.push(cigar.clone());

    Ok((StatusCode::CREATED, Json(Envelope::new(cigar))))
}

/// PATCH /api/v1/cigars/:id
pub async fn update_cigar(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<CigarUpdate>,
) -> MockResult<Json<Envelope<Cigar>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = owned_cigar_index(&store, &id, &viewer)?;
    if let Some(target) = &req.humidor_id {
        store.owned_humidor(target, &viewer)?;
    }
    if req.quantity == Some(0) {
        return Err(MockError::Validation(
            "Quantity must be at least 1; remove the cigar instead".to_string(),
        ));
    }

    let cigar = &mut store.cigars[idx];
    if let Some(quantity) = req.quantity {
        cigar.quantity = quantity;
    }
    if let Some(notes) = req.notes {
        cigar.notes = Some(notes).filter(|n| !n.is_empty());
    }
    if let Some(price) = req.price_cents {
        cigar.price_cents = Some(price);
    }
    if let Some(humidor_id) = req.humidor_id {
        cigar.humidor_id = humidor_id;
    }

    Ok(Json(Envelope::new(cigar.clone())))
}

/// DELETE /api/v1/cigars/:id
pub async fn delete_cigar(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = owned_cigar_index(&store, &id, &viewer)?;

    store.cigars.remove(idx);
    Ok(StatusCode::NO_CONTENT)
}
