//! Resolución de entidades
//!
//! Mapea datos de identidad parciales a un Client/Vehicle existente o
//! recién creado, dentro de la transacción del caller. Toda
//! normalización (CPF/CNPJ a dígitos, matrícula a mayúsculas sin
//! separadores) ocurre antes de cualquier lookup o escritura.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{client::Client, vehicle::Vehicle};
use crate::repositories::{client_repository, vehicle_repository};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{is_valid_tax_id, normalize_plate, normalize_tax_id, placeholder_email};

/// Identidad de cliente: o un id existente, o los datos mínimos para crear
#[derive(Debug, Default)]
pub struct ClientInput<'a> {
    pub client_id: Option<Uuid>,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub cpf_or_cnpj: Option<&'a str>,
    /// Caller de autoservicio: sin email real se sintetiza uno a partir
    /// del teléfono, y el cliente queda marcado como externo.
    pub is_external: bool,
}

/// Identidad de vehículo: o un id existente, o al menos la matrícula
#[derive(Debug, Default)]
pub struct VehicleInput<'a> {
    pub vehicle_id: Option<Uuid>,
    pub plate: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub year: Option<i32>,
}

pub async fn resolve_or_create_client(
    conn: &mut PgConnection,
    input: &ClientInput<'_>,
) -> AppResult<Client> {
    if let Some(client_id) = input.client_id {
        return client_repository::find_by_id(conn, client_id)
            .await?
            .ok_or_else(|| AppError::invalid_relation("client_id", "Client not found"));
    }

    let (name, phone, raw_tax_id) = match (input.name, input.phone, input.cpf_or_cnpj) {
        (Some(name), Some(phone), Some(tax_id)) => (name, phone, tax_id),
        _ => {
            return Err(AppError::validation(
                "INCOMPLETE_CLIENT_DATA",
                None,
                "Name, phone and CPF/CNPJ are required to create a client",
            ))
        }
    };

    let email = match (input.email, input.is_external) {
        (Some(email), _) => email.to_string(),
        (None, true) => placeholder_email(phone),
        (None, false) => {
            return Err(AppError::validation(
                "INCOMPLETE_CLIENT_DATA",
                Some("email"),
                "Email is required to create a client",
            ))
        }
    };

    let tax_id = normalize_tax_id(raw_tax_id);
    if !is_valid_tax_id(&tax_id) {
        return Err(AppError::validation(
            "VALIDATION_ERROR",
            Some("cpf_or_cnpj"),
            "CPF/CNPJ must contain 11 or 14 digits",
        ));
    }

    // El CPF/CNPJ es la identidad autoritativa: si ya existe, se reutiliza
    if let Some(existing) = client_repository::find_by_tax_id(conn, &tax_id).await? {
        return Ok(existing);
    }

    if client_repository::find_by_email(conn, &email).await?.is_some() {
        return Err(AppError::conflict(
            "DUPLICATE_FIELD",
            Some("email"),
            "A client with this email already exists",
        ));
    }

    if client_repository::find_by_phone(conn, phone).await?.is_some() {
        return Err(AppError::conflict(
            "DUPLICATE_FIELD",
            Some("phone"),
            "A client with this phone already exists",
        ));
    }

    client_repository::insert(
        conn,
        client_repository::NewClient {
            name,
            cpf_or_cnpj: &tax_id,
            email: &email,
            phone,
            address: input.address.unwrap_or("-"),
            is_external: input.is_external,
        },
    )
    .await
}

pub async fn resolve_or_create_vehicle(
    conn: &mut PgConnection,
    input: &VehicleInput<'_>,
    client_id: Uuid,
) -> AppResult<Vehicle> {
    if let Some(vehicle_id) = input.vehicle_id {
        let vehicle = vehicle_repository::find_by_id(conn, vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("VEHICLE_NOT_FOUND", Some("vehicle_id"), "Vehicle not found")
            })?;

        if vehicle.client_id != client_id {
            return Err(AppError::invalid_relation(
                "vehicle_id",
                "Vehicle belongs to another client",
            ));
        }

        return Ok(vehicle);
    }

    let raw_plate = input.plate.ok_or_else(|| {
        AppError::validation("MISSING_PLATE", Some("plate"), "Vehicle plate is required")
    })?;

    let plate = normalize_plate(raw_plate);
    if plate.is_empty() {
        return Err(AppError::validation(
            "MISSING_PLATE",
            Some("plate"),
            "Vehicle plate is required",
        ));
    }

    if let Some(existing) = vehicle_repository::find_by_plate(conn, &plate).await? {
        if existing.client_id == client_id {
            return Ok(existing);
        }

        return Err(AppError::conflict(
            "DUPLICATE_PLATE",
            Some("plate"),
            "This plate is already registered to another client",
        ));
    }

    vehicle_repository::insert(
        conn,
        vehicle_repository::NewVehicle {
            plate: &plate,
            brand: input.brand.unwrap_or(""),
            model: input.model.unwrap_or(""),
            year: input.year.unwrap_or(0),
            client_id,
        },
    )
    .await
}
