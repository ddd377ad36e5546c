//! Build image definition

/// User the packaging tools run as inside the container
pub const BUILD_USER: &str = "builder";

/// Container side of the bind mounts
pub const CONTAINER_SOURCE_DIR: &str = "/build/source";
pub const CONTAINER_BUILD_DIR: &str = "/build";
pub const CONTAINER_ARCHIVE_DIR: &str = "/archive";

const TEMPLATE: &str = r#"FROM {{FROM}}

ENV DEBIAN_FRONTEND=noninteractive

RUN apt-get update && \
    apt-get install -y --no-install-recommends \
        build-essential \
        debhelper \
        devscripts \
        dpkg-dev \
        equivs \
        fakeroot \
        lintian \
        sudo && \
    rm -rf /var/lib/apt/lists/*

RUN useradd -m -s /bin/bash {{USER}} && \
    echo "{{USER}} ALL=(ALL) NOPASSWD: ALL" > /etc/sudoers.d/{{USER}} && \
    chmod 0440 /etc/sudoers.d/{{USER}}

RUN echo "deb [trusted=yes] file://{{ARCHIVE}} ./" > /etc/apt/sources.list.d/deber.list

RUN printf '#!/bin/sh\nset -e\ncd {{ARCHIVE}}\ndpkg-scanpackages -m . > Packages\n' > /usr/local/bin/scan && \
    chmod 0755 /usr/local/bin/scan

RUN printf '#!/bin/sh\nexec apt-get -y -o Debug::pkgProblemResolver=yes --no-install-recommends "$@"\n' > /usr/local/bin/apty && \
    chmod 0755 /usr/local/bin/apty

USER {{USER}}
WORKDIR {{SOURCE}}

CMD ["sleep", "infinity"]
"#;

/// Renders the Dockerfile for a build image based on `base` (`repo:tag`)
pub fn render(base: &str) -> String {
    TEMPLATE
        .replace("{{FROM}}", base)
        .replace("{{USER}}", BUILD_USER)
        .replace("{{ARCHIVE}}", CONTAINER_ARCHIVE_DIR)
        .replace("{{SOURCE}}", CONTAINER_SOURCE_DIR)
}
